//! Onboarding snapshot data model, as reported by the status endpoint.

use serde::{Deserialize, Serialize};

use super::state::NextStep;

/// Legal form of the supplier. Decides whether PAN verification applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplierType {
    Individual,
    Company,
}

impl std::fmt::Display for SupplierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Individual => write!(f, "INDIVIDUAL"),
            Self::Company => write!(f, "COMPANY"),
        }
    }
}

/// Verification state of an individual supplier's PAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PanStatus {
    #[default]
    NotStarted,
    Pending,
    Verified,
    Rejected,
}

impl std::fmt::Display for PanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotStarted => "NOT_STARTED",
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::Rejected => "REJECTED",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualPan {
    #[serde(default)]
    pub status: PanStatus,
}

/// Per-step completion flags.
///
/// Every field defaults so a partially populated payload still decodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSteps {
    #[serde(default)]
    pub supplier_type_selected: bool,
    #[serde(default)]
    pub email_otp_verified: bool,
    /// Only meaningful when the supplier is an individual.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individual_pan: Option<IndividualPan>,
    #[serde(default)]
    pub profile_completed: bool,
}

impl OnboardingSteps {
    /// PAN status, treating a missing record as not started.
    pub fn pan_status(&self) -> PanStatus {
        self.individual_pan.as_ref().map(|p| p.status).unwrap_or_default()
    }
}

/// Server-reported onboarding progress for the signed-in supplier.
///
/// Immutable once fetched: a refetch produces a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSnapshot {
    #[serde(default)]
    pub supplier_type: Option<SupplierType>,
    #[serde(default)]
    pub steps: OnboardingSteps,
    /// Server-computed next step. Authoritative when present.
    #[serde(default)]
    pub next_step: Option<NextStep>,
}

impl OnboardingSnapshot {
    pub fn is_individual(&self) -> bool {
        self.supplier_type == Some(SupplierType::Individual)
    }
}
