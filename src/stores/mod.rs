//! Session state containers — auth, supplier and theme stores.
//!
//! Each store is an explicit value owned by the caller rather than a global.
//! `SessionStores` groups them with a defined lifecycle: `init` on app start,
//! `clear_on_logout` when the session ends. Theme is a device preference and
//! survives logout; auth and supplier state do not.

pub mod auth;
pub mod supplier;
pub mod theme;

use std::sync::Arc;

use tracing::info;

pub use auth::AuthStore;
pub use supplier::{SupplierProfile, SupplierStore};
pub use theme::{ThemeMode, ThemeStore};

/// All per-session stores, cheap to clone and share.
#[derive(Clone, Default)]
pub struct SessionStores {
    pub auth: Arc<AuthStore>,
    pub supplier: Arc<SupplierStore>,
    pub theme: Arc<ThemeStore>,
}

impl SessionStores {
    /// Create the stores on app start with the given theme preference.
    pub fn init(theme: ThemeMode) -> Self {
        let stores = Self {
            auth: Arc::new(AuthStore::new()),
            supplier: Arc::new(SupplierStore::new()),
            theme: Arc::new(ThemeStore::new(theme)),
        };
        info!(theme = %theme, "Session stores initialized");
        stores
    }

    /// Drop everything tied to the signed-in supplier.
    pub async fn clear_on_logout(&self) {
        self.auth.clear().await;
        self.supplier.clear().await;
        info!("Session cleared on logout");
    }
}
