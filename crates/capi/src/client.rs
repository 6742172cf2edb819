//! Conversions API client: trait plus the Graph API HTTP implementation.

use async_trait::async_trait;
use relay_core::{CanonicalEvent, Error, Result, TenantConfig};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::payload::EventsRequest;

/// Dispatch timeout. A slow Conversions API is treated the same as a
/// failed one; events are fire-and-forget-once and never queued.
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Acknowledgement from a successful submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DispatchReceipt {
    #[serde(default)]
    pub events_received: u32,
    #[serde(default)]
    pub fbtrace_id: Option<String>,
}

/// Submits canonical events to the conversion-tracking API.
///
/// Credentials arrive per call: the resolved tenant is threaded through
/// the call chain by value, never stored in shared state.
#[async_trait]
pub trait ConversionsClient: Send + Sync {
    /// Submit one event under the given tenant's credentials. Single
    /// attempt; any transport or API-level failure is `Error::Dispatch`.
    async fn send_event(
        &self,
        tenant: &TenantConfig,
        event: &CanonicalEvent,
    ) -> Result<DispatchReceipt>;
}

/// HTTP client for the Graph API `/{pixel_id}/events` edge.
pub struct GraphApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl GraphApiClient {
    /// Creates a client against the given Graph API base URL, e.g.
    /// `https://graph.facebook.com/v18.0`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .timeout(DISPATCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

#[async_trait]
impl ConversionsClient for GraphApiClient {
    async fn send_event(
        &self,
        tenant: &TenantConfig,
        event: &CanonicalEvent,
    ) -> Result<DispatchReceipt> {
        let url = format!("{}/{}/events", self.base_url, tenant.pixel_id);
        let body = EventsRequest::new(tenant, event);

        debug!(
            pixel_id = %tenant.pixel_id,
            event_id = %event.event_id,
            event_name = event.event_name.as_str(),
            "submitting event"
        );

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "conversions api request failed");
                Error::dispatch(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "conversions api returned error");
            return Err(Error::dispatch(format!("api returned {status}: {body}")));
        }

        let receipt: DispatchReceipt = response
            .json()
            .await
            .map_err(|e| Error::dispatch(format!("invalid api response: {e}")))?;

        Ok(receipt)
    }
}
