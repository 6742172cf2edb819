//! Request payload builders.

use serde_json::{json, Value};

/// External id used by default fixtures.
pub const FIXTURE_USER_ID: &str = "user-fixture-1";

/// Minimal valid event payload for the given type and content id.
pub fn event_payload(event_type: &str, content_id: &str) -> Value {
    json!({
        "eventType": event_type,
        "contentId": content_id,
        "userId": FIXTURE_USER_ID,
        "_fbp": "fb.1.1700000000.1234567890",
        "event_source_url": "https://shop.example/page",
    })
}

/// Set one field on a payload.
pub fn with_field(mut payload: Value, key: &str, value: Value) -> Value {
    payload[key] = value;
    payload
}
