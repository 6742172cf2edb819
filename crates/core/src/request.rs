//! Inbound request model for `POST /events/send`.
//!
//! Accepts JSON or urlencoded form bodies. Field names follow the client
//! tracking script's wire contract (`_fbc`, `_fbp`, `fn`, `ln`, ...), so
//! serde renames carry the mapping onto readable Rust names.

use serde::Deserialize;
use validator::Validate;

use crate::error::{Error, Result};
use crate::event::EventType;

/// An inbound event request, before any enrichment.
///
/// `event_type` stays a raw string here so an unknown type can be answered
/// with the dedicated 400 body instead of a generic deserialization error;
/// [`InboundEventRequest::parsed_event_type`] does the closed-set check.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct InboundEventRequest {
    #[serde(rename = "eventType")]
    pub event_type: String,

    #[serde(default)]
    pub event_source_url: Option<String>,

    /// Browser ad-click cookie value.
    #[serde(rename = "_fbc", default)]
    pub fbc: Option<String>,

    /// Browser first-party pairing cookie value.
    #[serde(rename = "_fbp", default)]
    pub fbp: Option<String>,

    /// Stable pseudo-identity generated client-side.
    #[serde(rename = "userId", default)]
    pub external_id: Option<String>,

    #[serde(rename = "fn", default)]
    #[validate(length(max = 255))]
    pub first_name: Option<String>,

    #[serde(rename = "ln", default)]
    #[validate(length(max = 255))]
    pub last_name: Option<String>,

    #[serde(rename = "em", default)]
    #[validate(length(max = 255))]
    pub email: Option<String>,

    #[serde(rename = "ph", default)]
    #[validate(length(max = 32))]
    pub phone: Option<String>,

    /// Tenant/domain identifier; also the content-ids fallback.
    #[serde(rename = "contentId", default)]
    pub content_id: Option<String>,

    #[serde(default)]
    pub content_ids: Option<Vec<String>>,

    #[serde(default)]
    pub value: Option<f64>,

    #[serde(default)]
    #[validate(length(equal = 3))]
    pub currency: Option<String>,

    #[serde(default)]
    pub content_type: Option<String>,

    #[serde(default)]
    pub content_category: Option<Vec<String>>,

    #[serde(default)]
    pub content_name: Option<Vec<String>>,

    #[serde(default)]
    pub num_items: Option<u32>,

    #[serde(default)]
    pub search_string: Option<String>,

    // Descriptive passthrough fields. Logged for diagnostics, never
    // forwarded to the Conversions API.
    #[serde(default)]
    pub app: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub referrer_url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub page_title: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
}

impl InboundEventRequest {
    /// Parse a request body. JSON unless the content type says urlencoded.
    ///
    /// Form bodies cannot carry the array-valued fields (`content_ids`,
    /// `content_category`, `content_name`); form clients rely on the
    /// `contentId` fallback instead.
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self> {
        let is_form = content_type
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            serde_urlencoded::from_bytes(body)
                .map_err(|e| Error::validation(format!("invalid form body: {e}")))
        } else {
            serde_json::from_slice(body)
                .map_err(|e| Error::validation(format!("invalid JSON body: {e}")))
        }
    }

    /// Validate `event_type` against the closed set.
    pub fn parsed_event_type(&self) -> Result<EventType> {
        self.event_type.parse()
    }
}
