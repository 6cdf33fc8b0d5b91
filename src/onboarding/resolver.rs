//! Step resolution — maps a snapshot to the step the supplier must do next.

use tracing::{debug, warn};

use super::model::{OnboardingSnapshot, PanStatus, SupplierType};
use super::state::NextStep;

/// Where a resolved step came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSource {
    /// The server sent `nextStep`.
    Server,
    /// Derived from the step flags.
    Derived,
}

/// Outcome of resolving a snapshot, with enough context to audit the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub step: NextStep,
    pub source: StepSource,
    /// Every step gate claimed passed but no supplier type was set, so `Done`
    /// came from the final fallback rule rather than a consistent payload.
    pub is_ambiguous: bool,
}

impl Resolution {
    pub fn is_complete(&self) -> bool {
        self.step.is_terminal()
    }
}

/// Resolve the next step. The server's `nextStep` wins when present;
/// otherwise the step flags are checked in gating order.
pub fn resolve_next_step(snapshot: &OnboardingSnapshot) -> NextStep {
    resolve(snapshot).step
}

/// Whether onboarding is finished for this snapshot.
pub fn is_complete(snapshot: &OnboardingSnapshot) -> bool {
    resolve_next_step(snapshot).is_terminal()
}

/// Derive the next step from the step flags alone, ignoring the server hint.
pub fn derive_next_step(snapshot: &OnboardingSnapshot) -> NextStep {
    let steps = &snapshot.steps;
    if !steps.supplier_type_selected {
        NextStep::SelectType
    } else if !steps.email_otp_verified {
        NextStep::VerifyEmailOtp
    } else if snapshot.is_individual() && steps.pan_status() != PanStatus::Verified {
        NextStep::VerifyPan
    } else if !steps.profile_completed {
        NextStep::CompleteProfile
    } else {
        NextStep::Done
    }
}

/// How a freshly resolved step relates to the one resolved before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Unchanged,
    /// One legal step forward for the supplier type.
    Advanced,
    /// Forward, but past at least one gate.
    Skipped,
    /// Back to an earlier gate.
    Regressed,
}

/// Compare two resolutions of the same supplier's status.
pub fn progress(
    previous: NextStep,
    current: NextStep,
    supplier_type: Option<SupplierType>,
) -> Progress {
    if previous == current {
        Progress::Unchanged
    } else if previous.can_transition_to(current, supplier_type) {
        Progress::Advanced
    } else if current.ordinal() < previous.ordinal() {
        Progress::Regressed
    } else {
        Progress::Skipped
    }
}

/// Resolve with provenance.
pub fn resolve(snapshot: &OnboardingSnapshot) -> Resolution {
    if let Some(step) = snapshot.next_step {
        let derived = derive_next_step(snapshot);
        if derived != step {
            debug!(server = %step, derived = %derived, "Server next step differs from step flags");
        }
        return Resolution {
            step,
            source: StepSource::Server,
            is_ambiguous: false,
        };
    }

    let step = derive_next_step(snapshot);
    // A blank snapshot cannot reach `Done` through real progress: selecting a
    // type is the first gate, so this only fires for inconsistent payloads
    // that claim every gate passed without a supplier type.
    let is_ambiguous = step == NextStep::Done && snapshot.supplier_type.is_none();
    if is_ambiguous {
        warn!("Onboarding snapshot resolved to DONE without a supplier type; treating as complete");
    }
    Resolution {
        step,
        source: StepSource::Derived,
        is_ambiguous,
    }
}
