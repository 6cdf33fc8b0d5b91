//! Status fetcher — loads onboarding snapshots and holds the transient
//! loading/error/data state a view renders from.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::PortalConfig;
use crate::error::FetchError;
use crate::stores::AuthStore;

use super::model::OnboardingSnapshot;
use super::resolver::{self, Progress, Resolution};
use super::state::NextStep;

/// Anything that can produce an onboarding snapshot.
///
/// `Ok(None)` is a successful response that carried no snapshot (empty body,
/// `null`, or `{"data": null}`).
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self) -> Result<Option<OnboardingSnapshot>, FetchError>;
}

// ── HTTP source ─────────────────────────────────────────────────────────

/// Error body shape used by the portal API. All fields optional.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Fetches the snapshot from the portal REST API.
pub struct HttpStatusSource {
    client: reqwest::Client,
    url: String,
    auth: Arc<AuthStore>,
}

impl HttpStatusSource {
    pub fn new(config: &PortalConfig, auth: Arc<AuthStore>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            url: config.status_url(),
            auth,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self) -> Result<Option<OnboardingSnapshot>, FetchError> {
        let mut request = self.client.get(&self.url).header(ACCEPT, "application/json");
        match self.auth.authorization().await {
            Some(value) => request = request.header(AUTHORIZATION, value),
            None => debug!(url = %self.url, "No session token; requesting status anonymously"),
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = decode_error(status.as_u16(), status.canonical_reason(), &body);
            warn!(status = status.as_u16(), code = ?err.code(), "Onboarding status request failed");
            return Err(err);
        }

        let bytes = response.bytes().await?;
        decode_snapshot(&bytes)
    }
}

/// Decode a non-2xx response into a `FetchError`.
pub(crate) fn decode_error(status: u16, reason: Option<&str>, body: &str) -> FetchError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.error)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty() && trimmed.len() <= 200).then(|| trimmed.to_string())
        })
        .or_else(|| reason.map(String::from))
        .unwrap_or_else(|| format!("HTTP {status}"));
    FetchError::from_status(status, parsed.code, message)
}

/// Decode a 2xx body. Accepts the snapshot bare or wrapped in `{"data": ...}`.
/// An empty body or a `null` snapshot decodes to `None`.
pub(crate) fn decode_snapshot(bytes: &[u8]) -> Result<Option<OnboardingSnapshot>, FetchError> {
    if bytes.trim_ascii().is_empty() {
        return Ok(None);
    }
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
    let value = match value {
        serde_json::Value::Object(mut obj) if !obj.contains_key("steps") && obj.contains_key("data") => {
            obj.remove("data").unwrap_or_default()
        }
        other => other,
    };
    let value = match value {
        serde_json::Value::Null => return Ok(None),
        serde_json::Value::Object(obj) => serde_json::Value::Object(obj),
        other => {
            return Err(FetchError::Decode(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )));
        }
    };
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| FetchError::Decode(e.to_string()))
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ── Fetcher state ───────────────────────────────────────────────────────

/// What a view renders from: at most one of `data` / `error` is set. Neither
/// is set after a successful response that carried no snapshot.
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    pub loading: bool,
    pub data: Option<Arc<OnboardingSnapshot>>,
    pub error: Option<FetchError>,
    /// Client-side time the current `data` arrived.
    pub fetched_at: Option<DateTime<Utc>>,
}

/// `FetchState` plus the resolved step, the shape the router consumes.
#[derive(Debug, Clone, Default)]
pub struct OnboardingStatus {
    pub loading: bool,
    pub data: Option<Arc<OnboardingSnapshot>>,
    pub error: Option<FetchError>,
    pub next_step: Option<NextStep>,
    pub is_complete: bool,
    pub resolution: Option<Resolution>,
}

impl From<FetchState> for OnboardingStatus {
    fn from(state: FetchState) -> Self {
        let resolution = state.data.as_deref().map(resolver::resolve);
        Self {
            loading: state.loading,
            next_step: resolution.map(|r| r.step),
            is_complete: resolution.is_some_and(|r| r.is_complete()),
            resolution,
            data: state.data,
            error: state.error,
        }
    }
}

struct Inner {
    state: FetchState,
    in_flight: usize,
}

/// Owns the status of one mounted view.
///
/// Overlapping fetches are not cancelled or de-duplicated: each resolution
/// overwrites the state, so the last one to finish wins. After `unmount`,
/// late resolutions are discarded.
pub struct StatusFetcher {
    source: Arc<dyn StatusSource>,
    inner: RwLock<Inner>,
    mounted: AtomicBool,
}

impl StatusFetcher {
    /// A fresh fetcher reports `loading` until its first fetch resolves.
    pub fn new(source: Arc<dyn StatusSource>) -> Self {
        Self {
            source,
            inner: RwLock::new(Inner {
                state: FetchState {
                    loading: true,
                    ..Default::default()
                },
                in_flight: 0,
            }),
            mounted: AtomicBool::new(true),
        }
    }

    /// Fetch a new snapshot and store the outcome. Returns this call's outcome
    /// regardless of whether a later resolution has since replaced it.
    ///
    /// Once unmounted the request still runs but leaves the state untouched.
    pub async fn fetch(&self) -> Result<Option<Arc<OnboardingSnapshot>>, FetchError> {
        if !self.is_mounted() {
            debug!("Fetching onboarding status for an unmounted view; state left untouched");
            return self.source.fetch_status().await.map(|s| s.map(Arc::new));
        }
        {
            let mut inner = self.inner.write().await;
            inner.in_flight += 1;
            inner.state.loading = true;
        }

        let result = self.source.fetch_status().await.map(|s| s.map(Arc::new));

        let mut inner = self.inner.write().await;
        inner.in_flight = inner.in_flight.saturating_sub(1);

        if !self.is_mounted() {
            debug!("Discarding onboarding status resolved after unmount");
            return result;
        }

        inner.state.loading = inner.in_flight > 0;
        match &result {
            Ok(Some(snapshot)) => {
                let step = resolver::resolve_next_step(snapshot);
                match inner.state.data.as_deref().map(resolver::resolve_next_step) {
                    Some(previous) => {
                        match resolver::progress(previous, step, snapshot.supplier_type) {
                            Progress::Regressed => warn!(
                                previous = %previous,
                                next_step = %step,
                                "Onboarding step moved backwards"
                            ),
                            Progress::Skipped => debug!(
                                previous = %previous,
                                next_step = %step,
                                "Onboarding step skipped ahead"
                            ),
                            Progress::Advanced => debug!(
                                previous = %previous,
                                next_step = %step,
                                "Onboarding step advanced"
                            ),
                            Progress::Unchanged => debug!(next_step = %step, "Onboarding status fetched"),
                        }
                    }
                    None => debug!(next_step = %step, "Onboarding status fetched"),
                }
                inner.state.data = Some(Arc::clone(snapshot));
                inner.state.error = None;
                inner.state.fetched_at = Some(Utc::now());
            }
            Ok(None) => {
                warn!("Onboarding status response carried no snapshot");
                inner.state.data = None;
                inner.state.error = None;
                inner.state.fetched_at = None;
            }
            Err(e) => {
                debug!(error = %e, kind = %e.kind(), "Onboarding status fetch failed");
                inner.state.data = None;
                inner.state.error = Some(e.clone());
                inner.state.fetched_at = None;
            }
        }
        result
    }

    /// Manual re-fetch. Safe to call repeatedly.
    pub async fn refetch(&self) -> Result<Option<Arc<OnboardingSnapshot>>, FetchError> {
        info!("Refetching onboarding status");
        self.fetch().await
    }

    pub async fn state(&self) -> FetchState {
        self.inner.read().await.state.clone()
    }

    pub async fn status(&self) -> OnboardingStatus {
        self.state().await.into()
    }

    /// Detach from the owning view. Held state is dropped and in-flight
    /// results are discarded when they land.
    pub async fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        let mut inner = self.inner.write().await;
        inner.state = FetchState::default();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}
