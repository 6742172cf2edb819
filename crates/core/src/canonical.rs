//! Canonical event assembly.
//!
//! [`normalize`] maps a validated inbound request plus the request-scoped
//! identity and geo results onto the single event value submitted to the
//! Conversions API. Events are immutable after assembly and are never
//! persisted locally; their only destinations are the external API and an
//! append-only log line.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::event::{EventType, StandardEvent};
use crate::identity::ResolvedIdentity;
use crate::location::GeoLocation;
use crate::request::InboundEventRequest;

/// Fixed action source for everything this relay submits.
pub const ACTION_SOURCE: &str = "website";

/// Advanced-matching payload of a canonical event.
///
/// Absent fields are omitted from the wire payload entirely; the
/// Conversions API treats omission and empty values differently for some
/// match keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub client_ip_address: String,
    pub client_user_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fbc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fbp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Content payload of a canonical event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomData {
    pub content_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_category: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_name: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_items: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// The requested type, kept when the remap table changed the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_event: Option<String>,
}

/// The unit submitted to the Conversions API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub event_name: StandardEvent,
    /// Shared with the client so the browser pixel can report the same
    /// logical event without double-counting.
    pub event_id: String,
    /// Submission timestamp, unix seconds.
    pub event_time: i64,
    pub action_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_source_url: Option<String>,
    pub user_data: UserData,
    pub custom_data: CustomData,
}

/// Build the canonical event for one request.
///
/// `content_id` is the tenant/domain identifier used as the content-ids
/// fallback. Fails for `Init`, which has no canonical form.
pub fn normalize(
    event_type: EventType,
    request: &InboundEventRequest,
    identity: &ResolvedIdentity,
    geo: &GeoLocation,
    content_id: &str,
) -> Result<CanonicalEvent> {
    let event_name = event_type
        .standard()
        .ok_or_else(|| Error::InvalidEventType(event_type.to_string()))?;

    let custom_data = CustomData {
        content_ids: resolve_content_ids(request.content_ids.as_deref(), content_id),
        content_type: non_empty(request.content_type.as_deref()),
        content_category: non_empty_list(request.content_category.as_deref()),
        content_name: non_empty_list(request.content_name.as_deref()),
        num_items: request.num_items.filter(|n| *n > 0),
        // Search strings only make sense on the Search event itself.
        search_string: if event_type == EventType::Search {
            non_empty(request.search_string.as_deref())
        } else {
            None
        },
        value: request.value.filter(|v| *v != 0.0),
        currency: non_empty(request.currency.as_deref()),
        original_event: event_type
            .is_remapped()
            .then(|| event_type.as_str().to_string()),
    };

    let user_data = UserData {
        client_ip_address: identity.client_ip.clone(),
        client_user_agent: identity.user_agent.clone(),
        fbc: non_empty(request.fbc.as_deref()),
        fbp: non_empty(request.fbp.as_deref()),
        external_id: non_empty(request.external_id.as_deref()),
        country: geo.country.clone(),
        state: geo.state.clone(),
        city: geo.city.clone(),
        zip_code: geo.postal_code.clone(),
        first_name: identity.first_name.clone(),
        last_name: identity.last_name.clone(),
        email: identity.email.clone(),
        phone: identity.phone.clone(),
    };

    Ok(CanonicalEvent {
        event_name,
        event_id: Uuid::new_v4().to_string(),
        event_time: chrono::Utc::now().timestamp(),
        action_source: ACTION_SOURCE.to_string(),
        event_source_url: non_empty(request.event_source_url.as_deref()),
        user_data,
        custom_data,
    })
}

/// Caller-supplied ids win, filtered of blank entries and order preserved;
/// an absent or fully-blank list falls back to the tenant identifier.
fn resolve_content_ids(requested: Option<&[String]>, content_id: &str) -> Vec<String> {
    if let Some(ids) = requested {
        let filtered: Vec<String> = ids
            .iter()
            .filter(|id| !id.trim().is_empty())
            .cloned()
            .collect();
        if !filtered.is_empty() {
            return filtered;
        }
    }
    vec![content_id.to_string()]
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn non_empty_list(value: Option<&[String]>) -> Option<Vec<String>> {
    value.filter(|v| !v.is_empty()).map(|v| v.to_vec())
}
