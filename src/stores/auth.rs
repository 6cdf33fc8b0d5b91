//! Auth store — holds the signed-in supplier's session token.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// An authenticated session.
#[derive(Debug)]
pub struct Session {
    token: SecretString,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

/// Holds at most one session. Starts signed out.
#[derive(Debug, Default)]
pub struct AuthStore {
    session: RwLock<Option<Session>>,
}

impl AuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current session.
    pub async fn sign_in(&self, token: impl Into<String>, email: impl Into<String>) {
        let email = email.into();
        info!(email = %email, "Supplier signed in");
        *self.session.write().await = Some(Session {
            token: SecretString::from(token.into()),
            email,
            signed_in_at: Utc::now(),
        });
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Email of the signed-in supplier, if any.
    pub async fn email(&self) -> Option<String> {
        self.session.read().await.as_ref().map(|s| s.email.clone())
    }

    /// `Authorization` header value for the current session.
    pub async fn authorization(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| format!("Bearer {}", s.token.expose_secret()))
    }

    pub async fn clear(&self) {
        if self.session.write().await.take().is_some() {
            debug!("Auth session cleared");
        }
    }
}
