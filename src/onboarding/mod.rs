//! Onboarding status and routing.
//!
//! A supplier walks through a fixed sequence of setup steps before reaching
//! the dashboard. The server reports progress as an `OnboardingSnapshot`; the
//! resolver turns it into the `NextStep`, and the router redirects the view to
//! the page for that step (or to login when the status cannot be loaded).

pub mod fetcher;
pub mod model;
pub mod navigator;
pub mod resolver;
pub mod router;
pub mod state;
pub mod validate;
pub mod view;

pub use fetcher::{FetchState, HttpStatusSource, OnboardingStatus, StatusFetcher, StatusSource};
pub use model::{IndividualPan, OnboardingSnapshot, OnboardingSteps, PanStatus, SupplierType};
pub use navigator::{HistoryNavigator, Navigator};
pub use resolver::{
    Progress, Resolution, StepSource, derive_next_step, is_complete, progress, resolve,
    resolve_next_step,
};
pub use router::{OnboardingRouter, RouteDecision, RouterOptions, RouterPhase};
pub use state::NextStep;
pub use validate::StepValidator;
pub use view::OnboardingView;
