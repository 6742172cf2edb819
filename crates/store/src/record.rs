//! The persisted user row.

use relay_core::{GeoLocation, ResolvedIdentity};
use serde::{Deserialize, Serialize};

/// Identity snapshot persisted on the first observed page view for a
/// given external id. Written once, never updated by the pipeline.
///
/// Field values default to empty strings rather than NULLs; the row is a
/// verbatim capture of whatever was known at that moment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub content_id: String,
    pub external_id: String,
    pub client_ip_address: String,
    pub client_user_agent: String,
    pub fbc: String,
    pub fbp: String,
    pub country: String,
    pub st: String,
    pub ct: String,
    pub zp: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl UserRecord {
    /// Capture the snapshot for one request.
    pub fn snapshot(
        content_id: &str,
        external_id: &str,
        identity: &ResolvedIdentity,
        geo: &GeoLocation,
        fbc: Option<&str>,
        fbp: Option<&str>,
    ) -> Self {
        Self {
            content_id: content_id.to_string(),
            external_id: external_id.to_string(),
            client_ip_address: identity.client_ip.clone(),
            client_user_agent: identity.user_agent.clone(),
            fbc: fbc.unwrap_or_default().to_string(),
            fbp: fbp.unwrap_or_default().to_string(),
            country: geo.country.clone().unwrap_or_default(),
            st: geo.state.clone().unwrap_or_default(),
            ct: geo.city.clone().unwrap_or_default(),
            zp: geo.postal_code.clone().unwrap_or_default(),
            first_name: identity.first_name.clone().unwrap_or_default(),
            last_name: identity.last_name.clone().unwrap_or_default(),
            email: identity.email.clone().unwrap_or_default(),
            phone: identity.phone.clone().unwrap_or_default(),
        }
    }
}
