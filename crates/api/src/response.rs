//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Success response for a dispatched event. `eventID` goes back to the
/// client so the browser pixel can fire the same logical event under the
/// same identifier.
#[derive(Debug, Serialize, Deserialize)]
pub struct SendResponse {
    #[serde(rename = "eventID")]
    pub event_id: String,
    pub external_id: String,
}

/// Response for the `Init` bootstrap probe: the server-resolved identity
/// and geo fields the client needs for its own in-browser tracking call.
/// `external_id` echoes the caller-supplied id; the server never
/// generates one here.
#[derive(Debug, Serialize, Deserialize)]
pub struct InitResponse {
    pub ct: Option<String>,
    pub st: Option<String>,
    pub zp: Option<String>,
    pub country: Option<String>,
    pub client_ip_address: String,
    pub client_user_agent: String,
    pub fbc: String,
    pub fbp: String,
    pub external_id: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub geo_database_loaded: bool,
    pub user_store_connected: bool,
}

/// Error response body. Downstream failure detail never reaches the
/// caller; it is logged server-side only.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// API error with its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn invalid_event_type() -> Self {
        Self::bad_request("invalid event type")
    }

    /// Opaque 500. Whatever actually failed stays in the logs.
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "internal server error".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<relay_core::Error> for ApiError {
    fn from(err: relay_core::Error) -> Self {
        match &err {
            relay_core::Error::InvalidEventType(_) => ApiError::invalid_event_type(),
            relay_core::Error::Validation(msg) => ApiError::bad_request(msg.clone()),
            relay_core::Error::Serialization(e) => ApiError::bad_request(e.to_string()),
            _ => ApiError::internal(),
        }
    }
}
