//! Error types for the supplier portal.

use serde::{Deserialize, Serialize};

/// Top-level error type for the portal core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Router error: {0}")]
    Router(#[from] RouterError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Coarse classification of a [`FetchError`], so callers can tell an expired
/// session apart from an outage without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// 401/403: the session is missing or expired.
    Unauthenticated,
    /// Any other non-2xx response.
    Server,
    /// Transport failure or timeout; no response was received.
    Network,
    /// A response arrived but the body was not a valid snapshot.
    Decode,
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Server => "server",
            Self::Network => "network",
            Self::Decode => "decode",
        };
        write!(f, "{s}")
    }
}

/// Failure of the onboarding status request.
///
/// Decoded once at the API boundary (`HttpStatusSource`); everything past that
/// point matches on variants instead of poking at loose fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Not authenticated ({status}): {message}")]
    Unauthorized {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Status request failed ({status}): {message}")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid status payload: {0}")]
    Decode(String),
}

impl FetchError {
    /// Build the right variant for a non-2xx response.
    pub fn from_status(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Unauthorized {
                status,
                code,
                message,
            },
            _ => Self::Http {
                status,
                code,
                message,
            },
        }
    }

    /// HTTP-like status code. Zero when no response was received or decoded.
    pub fn status(&self) -> u16 {
        match self {
            Self::Unauthorized { status, .. } | Self::Http { status, .. } => *status,
            Self::Network(_) | Self::Decode(_) => 0,
        }
    }

    /// Application error code from the response body, if the server sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { code, .. } | Self::Http { code, .. } => code.as_deref(),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Unauthorized { .. } => FetchErrorKind::Unauthenticated,
            Self::Http { .. } => FetchErrorKind::Server,
            Self::Network(_) => FetchErrorKind::Network,
            Self::Decode(_) => FetchErrorKind::Decode,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Router state machine errors.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("Router cannot transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

/// Input validation errors for onboarding step forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid PAN format: expected 5 letters, 4 digits, 1 letter")]
    InvalidPan,

    #[error("Invalid email OTP: expected {expected} digits")]
    InvalidOtp { expected: usize },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

/// Result type alias for the portal core.
pub type Result<T> = std::result::Result<T, Error>;
