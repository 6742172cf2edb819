//! Wire payload for the Graph API `/{pixel_id}/events` edge.
//!
//! Match keys are normalized and SHA-256 hashed at serialization time;
//! browser identifiers (`fbc`, `fbp`) and the transport fields (client
//! IP, user agent) travel plain, per the Conversions API contract.
//! Absent keys are omitted entirely, never sent as null or empty.

use relay_core::{CanonicalEvent, TenantConfig};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 over the trimmed, lowercased value.
pub fn hash_match_key(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.trim().to_lowercase().as_bytes());
    hex::encode(hasher.finalize())
}

fn hashed(value: &Option<String>) -> Option<String> {
    value.as_deref().map(hash_match_key)
}

/// Request body for one event submission.
#[derive(Debug, Serialize)]
pub struct EventsRequest<'a> {
    pub data: [WireEvent<'a>; 1],
    pub access_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_event_code: Option<&'a str>,
}

impl<'a> EventsRequest<'a> {
    pub fn new(tenant: &'a TenantConfig, event: &'a CanonicalEvent) -> Self {
        Self {
            data: [WireEvent::from_event(event)],
            access_token: &tenant.access_token,
            test_event_code: tenant.test_code.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WireEvent<'a> {
    pub event_name: &'a str,
    pub event_id: &'a str,
    pub event_time: i64,
    pub action_source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_source_url: Option<&'a str>,
    pub user_data: WireUserData<'a>,
    pub custom_data: WireCustomData<'a>,
}

impl<'a> WireEvent<'a> {
    pub fn from_event(event: &'a CanonicalEvent) -> Self {
        let user = &event.user_data;
        let custom = &event.custom_data;

        Self {
            event_name: event.event_name.as_str(),
            event_id: &event.event_id,
            event_time: event.event_time,
            action_source: &event.action_source,
            event_source_url: event.event_source_url.as_deref(),
            user_data: WireUserData {
                client_ip_address: &user.client_ip_address,
                client_user_agent: &user.client_user_agent,
                fbc: user.fbc.as_deref(),
                fbp: user.fbp.as_deref(),
                external_id: hashed(&user.external_id),
                country: hashed(&user.country),
                st: hashed(&user.state),
                ct: hashed(&user.city),
                zp: hashed(&user.zip_code),
                first_name: hashed(&user.first_name),
                last_name: hashed(&user.last_name),
                email: hashed(&user.email),
                phone: hashed(&user.phone),
            },
            custom_data: WireCustomData {
                content_ids: &custom.content_ids,
                content_type: custom.content_type.as_deref(),
                content_category: custom.content_category.as_deref(),
                content_name: custom.content_name.as_deref(),
                num_items: custom.num_items,
                search_string: custom.search_string.as_deref(),
                value: custom.value,
                currency: custom.currency.as_deref(),
                custom_properties: custom
                    .original_event
                    .as_deref()
                    .map(|original_event| CustomProperties { original_event }),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WireUserData<'a> {
    pub client_ip_address: &'a str,
    pub client_user_agent: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fbc: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fbp: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub st: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ct: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zp: Option<String>,
    #[serde(rename = "fn", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "ln", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "em", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "ph", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WireCustomData<'a> {
    pub content_ids: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_category: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_name: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_items: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_string: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_properties: Option<CustomProperties<'a>>,
}

#[derive(Debug, Serialize)]
pub struct CustomProperties<'a> {
    pub original_event: &'a str,
}
