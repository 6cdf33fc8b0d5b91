//! Onboarding router — turns an `OnboardingStatus` into a navigation decision.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RouteMap;
use crate::error::{FetchErrorKind, RouterError};

use super::fetcher::OnboardingStatus;
use super::navigator::Navigator;
use super::state::NextStep;

/// Router lifecycle for one page load.
///
/// Init → Loading → {Error, Success}; Success → {Redirecting, Settled}.
/// Error, Redirecting and Settled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterPhase {
    Init,
    Loading,
    Error,
    Success,
    Redirecting,
    Settled,
}

impl RouterPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: RouterPhase) -> bool {
        use RouterPhase::*;
        matches!(
            (self, target),
            (Init, Loading)
                | (Loading, Error)
                | (Loading, Success)
                | (Success, Redirecting)
                | (Success, Settled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error | Self::Redirecting | Self::Settled)
    }
}

impl std::fmt::Display for RouterPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::Loading => "loading",
            Self::Error => "error",
            Self::Success => "success",
            Self::Redirecting => "redirecting",
            Self::Settled => "settled",
        };
        write!(f, "{s}")
    }
}

/// What the view should do after routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RouteDecision {
    /// Fetch in flight; show a loading indicator.
    Wait,
    /// Status unavailable; sent to the login page. `reason` is `None` when the
    /// fetch succeeded but returned no snapshot.
    RedirectToLogin {
        route: String,
        reason: Option<FetchErrorKind>,
    },
    /// Onboarding complete; render the protected content.
    Render,
    /// Incomplete; sent to the page for `step`.
    Redirect { step: NextStep, route: String },
    /// Incomplete; handed to the caller's incomplete callback.
    Deferred { step: NextStep, route: String },
    /// Incomplete, auto-redirect off; the caller renders its own UI.
    Stay { step: NextStep },
}

pub type CompleteCallback = Box<dyn Fn() + Send + Sync>;
pub type IncompleteCallback = Box<dyn Fn(NextStep, &str) + Send + Sync>;

/// Caller hooks and redirect policy.
pub struct RouterOptions {
    pub auto_redirect: bool,
    on_complete: Option<CompleteCallback>,
    on_incomplete: Option<IncompleteCallback>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            auto_redirect: true,
            on_complete: None,
            on_incomplete: None,
        }
    }
}

impl RouterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_redirect(mut self, auto_redirect: bool) -> Self {
        self.auto_redirect = auto_redirect;
        self
    }

    /// Called when the status resolves complete.
    pub fn on_complete(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Called with the pending step and its route instead of navigating.
    pub fn on_incomplete(mut self, f: impl Fn(NextStep, &str) + Send + Sync + 'static) -> Self {
        self.on_incomplete = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for RouterOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterOptions")
            .field("auto_redirect", &self.auto_redirect)
            .field("on_complete", &self.on_complete.is_some())
            .field("on_incomplete", &self.on_incomplete.is_some())
            .finish()
    }
}

/// Routes one view based on its onboarding status.
pub struct OnboardingRouter {
    routes: RouteMap,
    options: RouterOptions,
    navigator: Arc<dyn Navigator>,
    phase: RouterPhase,
}

impl OnboardingRouter {
    pub fn new(routes: RouteMap, options: RouterOptions, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            routes,
            options,
            navigator,
            phase: RouterPhase::Init,
        }
    }

    pub fn phase(&self) -> RouterPhase {
        self.phase
    }

    pub fn routes(&self) -> &RouteMap {
        &self.routes
    }

    /// Move the phase forward, rejecting anything off the lifecycle graph.
    /// Staying in the current phase is allowed.
    pub fn transition(&mut self, target: RouterPhase) -> Result<(), RouterError> {
        if self.phase == target {
            return Ok(());
        }
        if !self.phase.can_transition_to(target) {
            return Err(RouterError::InvalidTransition {
                from: self.phase.to_string(),
                to: target.to_string(),
            });
        }
        debug!(from = %self.phase, to = %target, "Router phase transition");
        self.phase = target;
        Ok(())
    }

    /// Start a new page-load cycle.
    pub fn reset(&mut self) {
        self.phase = RouterPhase::Init;
    }

    /// Decide what to do for `status` and perform the side effects (callbacks,
    /// navigation). A status arriving after a terminal phase starts a new cycle.
    pub fn route(&mut self, status: &OnboardingStatus) -> Result<RouteDecision, RouterError> {
        if self.phase.is_terminal() {
            self.reset();
        }

        if status.loading {
            self.transition(RouterPhase::Loading)?;
            return Ok(RouteDecision::Wait);
        }

        if self.phase == RouterPhase::Init {
            self.transition(RouterPhase::Loading)?;
        }

        let step = match (&status.error, status.next_step) {
            (None, Some(step)) => step,
            (error, _) => {
                // Any failure is treated as signed-out. The reason rides along
                // so callers can tell an expired session from an outage.
                let reason = error.as_ref().map(|e| e.kind());
                match error {
                    Some(e) => warn!(error = %e, "Onboarding status unavailable; redirecting to login"),
                    None => warn!("Onboarding status empty; redirecting to login"),
                }
                self.transition(RouterPhase::Error)?;
                let route = self.routes.login.clone();
                self.navigator.navigate(&route);
                return Ok(RouteDecision::RedirectToLogin { route, reason });
            }
        };

        self.transition(RouterPhase::Success)?;

        if status.is_complete {
            if let Some(on_complete) = &self.options.on_complete {
                on_complete();
            }
            self.transition(RouterPhase::Settled)?;
            return Ok(RouteDecision::Render);
        }

        let route = self.routes.route_for(step).to_string();

        if let Some(on_incomplete) = &self.options.on_incomplete {
            on_incomplete(step, &route);
            self.transition(RouterPhase::Redirecting)?;
            return Ok(RouteDecision::Deferred { step, route });
        }

        if self.options.auto_redirect {
            info!(step = %step, route = %route, "Onboarding incomplete; redirecting");
            self.transition(RouterPhase::Redirecting)?;
            self.navigator.navigate(&route);
            return Ok(RouteDecision::Redirect { step, route });
        }

        self.transition(RouterPhase::Settled)?;
        Ok(RouteDecision::Stay { step })
    }
}
