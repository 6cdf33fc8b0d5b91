//! Supplier store — profile of the signed-in supplier.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::onboarding::SupplierType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierProfile {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub supplier_type: Option<SupplierType>,
}

#[derive(Debug, Default)]
pub struct SupplierStore {
    profile: RwLock<Option<SupplierProfile>>,
}

impl SupplierStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, profile: SupplierProfile) {
        *self.profile.write().await = Some(profile);
    }

    pub async fn get(&self) -> Option<SupplierProfile> {
        self.profile.read().await.clone()
    }

    /// Record the supplier type once it is known from an onboarding snapshot.
    /// No-op without a profile.
    pub async fn set_supplier_type(&self, supplier_type: SupplierType) {
        if let Some(profile) = self.profile.write().await.as_mut() {
            profile.supplier_type = Some(supplier_type);
        }
    }

    pub async fn clear(&self) {
        *self.profile.write().await = None;
    }
}
