//! Navigation side effects.

use std::sync::Mutex;

use tracing::{debug, info};

/// Performs client-side navigation.
///
/// Implementations must be idempotent: navigating to the current location is
/// a no-op.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

#[derive(Debug)]
struct History {
    entries: Vec<String>,
}

/// In-memory navigator that keeps a history stack.
#[derive(Debug)]
pub struct HistoryNavigator {
    history: Mutex<History>,
}

impl HistoryNavigator {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(History {
                entries: vec![initial.into()],
            }),
        }
    }

    pub fn current(&self) -> String {
        self.lock().entries.last().cloned().unwrap_or_default()
    }

    /// Every location visited, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.lock().entries.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, path: &str) {
        let mut history = self.lock();
        if history.entries.last().map(String::as_str) == Some(path) {
            debug!(path, "Already at target location; skipping navigation");
            return;
        }
        info!(path, "Navigating");
        history.entries.push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_navigation() {
        let nav = HistoryNavigator::new("/");
        nav.navigate("/onboarding/select-type");
        nav.navigate("/dashboard");
        assert_eq!(nav.current(), "/dashboard");
        assert_eq!(
            nav.entries(),
            vec!["/", "/onboarding/select-type", "/dashboard"]
        );
    }

    #[test]
    fn repeated_navigation_is_noop() {
        let nav = HistoryNavigator::new("/");
        nav.navigate("/auth/login");
        nav.navigate("/auth/login");
        nav.navigate("/auth/login");
        assert_eq!(nav.entries(), vec!["/", "/auth/login"]);
    }

    #[test]
    fn navigating_to_initial_location_is_noop() {
        let nav = HistoryNavigator::new("/onboarding/verify-pan");
        nav.navigate("/onboarding/verify-pan");
        assert_eq!(nav.entries().len(), 1);
    }
}
