//! Onboarding step progression.

use serde::{Deserialize, Serialize};

use super::model::SupplierType;

/// The onboarding steps a supplier walks through before the dashboard.
///
/// Progresses linearly: SelectType → VerifyEmailOtp → VerifyPan →
/// CompleteProfile → Done. Companies skip VerifyPan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NextStep {
    SelectType,
    VerifyEmailOtp,
    VerifyPan,
    CompleteProfile,
    Done,
}

impl NextStep {
    /// All steps in gating order.
    pub const ALL: [NextStep; 5] = [
        NextStep::SelectType,
        NextStep::VerifyEmailOtp,
        NextStep::VerifyPan,
        NextStep::CompleteProfile,
        NextStep::Done,
    ];

    /// Check if a transition from `self` to `target` is valid for the given
    /// supplier type. Without a type only the full individual path is valid.
    pub fn can_transition_to(&self, target: NextStep, supplier_type: Option<SupplierType>) -> bool {
        use NextStep::*;
        let skips_pan = supplier_type == Some(SupplierType::Company);
        match (self, target) {
            (SelectType, VerifyEmailOtp)
            | (VerifyPan, CompleteProfile)
            | (CompleteProfile, Done) => true,
            (VerifyEmailOtp, VerifyPan) => !skips_pan,
            (VerifyEmailOtp, CompleteProfile) => skips_pan,
            _ => false,
        }
    }

    /// Whether onboarding is finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Zero-based position in gating order.
    pub fn ordinal(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

impl std::fmt::Display for NextStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SelectType => "SELECT_TYPE",
            Self::VerifyEmailOtp => "VERIFY_EMAIL_OTP",
            Self::VerifyPan => "VERIFY_PAN",
            Self::CompleteProfile => "COMPLETE_PROFILE",
            Self::Done => "DONE",
        };
        write!(f, "{s}")
    }
}
