//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;
use crate::onboarding::NextStep;

/// Default portal API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Default path of the onboarding status endpoint, relative to the API base.
pub const DEFAULT_STATUS_PATH: &str = "/supplier/onboarding/status";

/// Login entry point used when the status check fails.
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";

/// Maps each onboarding step to the page that handles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMap {
    pub select_type: String,
    pub verify_email_otp: String,
    pub verify_pan: String,
    pub complete_profile: String,
    pub done: String,
    /// Unauthenticated fallback.
    pub login: String,
}

impl Default for RouteMap {
    fn default() -> Self {
        Self {
            select_type: "/onboarding/select-type".to_string(),
            verify_email_otp: "/onboarding/verify-email".to_string(),
            verify_pan: "/onboarding/verify-pan".to_string(),
            complete_profile: "/onboarding/complete-profile".to_string(),
            done: "/dashboard".to_string(),
            login: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl RouteMap {
    /// Path for a step.
    pub fn route_for(&self, step: NextStep) -> &str {
        match step {
            NextStep::SelectType => &self.select_type,
            NextStep::VerifyEmailOtp => &self.verify_email_otp,
            NextStep::VerifyPan => &self.verify_pan,
            NextStep::CompleteProfile => &self.complete_profile,
            NextStep::Done => &self.done,
        }
    }

}

/// Portal client configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Base URL of the portal REST API, without trailing slash.
    pub api_base_url: String,
    /// Path of the onboarding status endpoint.
    pub status_path: String,
    /// Request timeout handed to the HTTP client.
    pub request_timeout: Duration,
    /// Whether the router navigates on its own when onboarding is incomplete.
    pub auto_redirect: bool,
    pub routes: RouteMap,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            status_path: DEFAULT_STATUS_PATH.to_string(),
            request_timeout: Duration::from_secs(15),
            auto_redirect: true,
            routes: RouteMap::default(),
        }
    }
}

impl PortalConfig {
    /// Build config from environment variables, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup("SUPPLIER_PORTAL_API_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "SUPPLIER_PORTAL_API_URL".into(),
                message: format!("expected an http(s) URL, got '{api_base_url}'"),
            });
        }

        let status_path = match lookup("SUPPLIER_PORTAL_STATUS_PATH") {
            Some(p) if p.starts_with('/') => p,
            Some(p) => format!("/{p}"),
            None => defaults.status_path,
        };

        let request_timeout = match lookup("SUPPLIER_PORTAL_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "SUPPLIER_PORTAL_TIMEOUT_SECS".into(),
                    message: format!("'{raw}' is not a whole number of seconds"),
                })?;
                // A zero timeout fails every request.
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "SUPPLIER_PORTAL_TIMEOUT_SECS".into(),
                        message: "timeout must be at least one second".into(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        let auto_redirect = match lookup("SUPPLIER_PORTAL_AUTO_REDIRECT") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: "SUPPLIER_PORTAL_AUTO_REDIRECT".into(),
                message: format!("'{raw}' is not a boolean"),
            })?,
            None => defaults.auto_redirect,
        };

        Ok(Self {
            api_base_url,
            status_path,
            request_timeout,
            auto_redirect,
            routes: defaults.routes,
        })
    }

    /// Full URL of the status endpoint.
    pub fn status_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.status_path)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
