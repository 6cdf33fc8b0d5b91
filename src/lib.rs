//! Supplier Portal — onboarding status, step resolution and routing.

pub mod config;
pub mod error;
pub mod onboarding;
pub mod stores;
