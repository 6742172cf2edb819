//! `/events/send` handler: the relay pipeline for one event.
//!
//! Pipeline order matters: the event type is checked before any
//! enrichment runs, and geo enrichment completes (success or fail-null)
//! before the canonical event is assembled, because the event depends on
//! its output.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use relay_core::{normalize, EventType, InboundEventRequest, ResolvedIdentity, TenantConfig};
use tracing::{error, info, warn};
use user_store::UserRecord;
use validator::Validate;

use crate::extractors::ClientIp;
use crate::response::{ApiError, InitResponse, SendResponse};
use crate::state::AppState;

/// POST /events/send - Primary event relay endpoint.
///
/// Accepts a single event as JSON or an urlencoded form, enriches it,
/// and submits it to the Conversions API under the tenant's credentials.
/// Returns the shared event identifier for client-side pixel dedup.
pub async fn send_handler(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let request = InboundEventRequest::parse(content_type, &body).map_err(|e| {
        warn!(error = %e, "failed to parse event request");
        ApiError::from(e)
    })?;

    request
        .validate()
        .map_err(|e| ApiError::bad_request(format!("validation failed: {e}")))?;

    // Closed-set check happens before any enrichment work.
    let event_type = request.parsed_event_type().map_err(|e| {
        warn!(event_type = %request.event_type, "rejected unknown event type");
        ApiError::from(e)
    })?;

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let identity = ResolvedIdentity::resolve(client_ip, user_agent, &request);
    let geo = state.geo.resolve(&identity.client_ip);

    let content_id = request.content_id.clone().unwrap_or_default();
    let tenant: TenantConfig = match state.tenants.resolve(&content_id) {
        Some(config) => config.clone(),
        None => {
            info!(content_id = %content_id, "no tenant entry for content id, using ambient credentials");
            state.default_tenant.clone()
        }
    };

    // Bootstrap probe: hand the resolved identity/geo straight back so
    // the client can seed its in-browser tracking call. Nothing is
    // dispatched and no user is recorded.
    if event_type == EventType::Init {
        return Ok(Json(InitResponse {
            ct: geo.city,
            st: geo.state,
            zp: geo.postal_code,
            country: geo.country,
            client_ip_address: identity.client_ip,
            client_user_agent: identity.user_agent,
            fbc: request.fbc.unwrap_or_default(),
            fbp: request.fbp.unwrap_or_default(),
            external_id: request.external_id.unwrap_or_default(),
        })
        .into_response());
    }

    let event = normalize(event_type, &request, &identity, &geo, &content_id)?;

    // First-party page loads record the user once; later snapshots never
    // overwrite the first.
    if event_type == EventType::PageView {
        if let Some(external_id) = request.external_id.as_deref().filter(|id| !id.is_empty()) {
            let record = UserRecord::snapshot(
                &content_id,
                external_id,
                &identity,
                &geo,
                request.fbc.as_deref(),
                request.fbp.as_deref(),
            );
            state.users.ensure_user(&record).await.map_err(|e| {
                error!(external_id = %external_id, error = %e, "failed to record user");
                ApiError::internal()
            })?;
        }
    }

    match state.dispatcher.send_event(&tenant, &event).await {
        Ok(receipt) => {
            info!(
                target: "events",
                event_id = %event.event_id,
                event_name = event.event_name.as_str(),
                original_event = event_type.as_str(),
                content_id = %content_id,
                events_received = receipt.events_received,
                fbtrace_id = receipt.fbtrace_id.as_deref().unwrap_or(""),
                "event dispatched"
            );
        }
        Err(e) => {
            error!(
                event_id = %event.event_id,
                event_name = event.event_name.as_str(),
                action_source = %event.action_source,
                error = %e,
                "event dispatch failed"
            );
            return Err(ApiError::internal());
        }
    }

    Ok(Json(SendResponse {
        event_id: event.event_id,
        external_id: request.external_id.unwrap_or_default(),
    })
    .into_response())
}
