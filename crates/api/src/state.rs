//! Application state shared across handlers.

use capi_client::ConversionsClient;
use geo_enrich::GeoEnricher;
use relay_core::{TenantConfig, TenantMap};
use std::sync::Arc;
use user_store::UserStore;

/// Shared application state.
///
/// The tenant map and default credentials are read-only for the life of
/// the process. Per-request credential resolution clones out of here and
/// threads the result through the call chain; nothing ever writes back.
#[derive(Clone)]
pub struct AppState {
    /// Conversions API client (HTTP in production, mock in tests).
    pub dispatcher: Arc<dyn ConversionsClient>,
    /// First-party user store.
    pub users: Arc<dyn UserStore>,
    /// Geo enricher; answers with the empty location when unavailable.
    pub geo: Arc<GeoEnricher>,
    /// Per-tenant credential map, keyed by content id.
    pub tenants: Arc<TenantMap>,
    /// Ambient credentials used when a content id has no tenant entry.
    pub default_tenant: TenantConfig,
}

impl AppState {
    pub fn new(
        dispatcher: Arc<dyn ConversionsClient>,
        users: Arc<dyn UserStore>,
        geo: Arc<GeoEnricher>,
        tenants: Arc<TenantMap>,
        default_tenant: TenantConfig,
    ) -> Self {
        Self {
            dispatcher,
            users,
            geo,
            tenants,
            default_tenant,
        }
    }
}
