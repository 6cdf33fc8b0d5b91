//! Onboarding view — one mounted page that guards its content behind the
//! onboarding status.

use std::sync::Arc;

use tokio::sync::Mutex;

use tracing::debug;

use crate::error::Result;
use crate::stores::SupplierStore;

use super::fetcher::{OnboardingStatus, StatusFetcher, StatusSource};
use super::router::{OnboardingRouter, RouteDecision};

/// Pairs a status fetcher with a router for the lifetime of one page.
pub struct OnboardingView {
    fetcher: StatusFetcher,
    router: Mutex<OnboardingRouter>,
    supplier: Option<Arc<SupplierStore>>,
}

impl OnboardingView {
    pub fn new(source: Arc<dyn StatusSource>, router: OnboardingRouter) -> Self {
        Self {
            fetcher: StatusFetcher::new(source),
            router: Mutex::new(router),
            supplier: None,
        }
    }

    /// Keep the supplier profile's type in step with fetched snapshots.
    pub fn with_supplier_store(mut self, supplier: Arc<SupplierStore>) -> Self {
        self.supplier = Some(supplier);
        self
    }

    /// First render: fetch once and route on the result.
    pub async fn mount(&self) -> Result<RouteDecision> {
        self.router.lock().await.route(&self.fetcher.status().await)?;
        self.load().await
    }

    /// Fetch again and re-route.
    pub async fn refetch(&self) -> Result<RouteDecision> {
        self.load().await
    }

    async fn load(&self) -> Result<RouteDecision> {
        // Fetch failures are routed, not returned.
        let fetched = self.fetcher.fetch().await;
        if !self.fetcher.is_mounted() {
            return Ok(RouteDecision::Wait);
        }
        if let (Some(store), Ok(Some(snapshot))) = (&self.supplier, &fetched) {
            if let Some(supplier_type) = snapshot.supplier_type {
                debug!(supplier_type = %supplier_type, "Recording supplier type from status");
                store.set_supplier_type(supplier_type).await;
            }
        }
        let status = self.fetcher.status().await;
        Ok(self.router.lock().await.route(&status)?)
    }

    pub async fn status(&self) -> OnboardingStatus {
        self.fetcher.status().await
    }

    pub fn fetcher(&self) -> &StatusFetcher {
        &self.fetcher
    }

    pub async fn unmount(&self) {
        self.fetcher.unmount().await;
    }
}
