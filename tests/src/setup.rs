//! Common test setup functions.

use api::{router, AppState};
use axum::Router;
use capi_client::ConversionsClient;
use geo_enrich::GeoEnricher;
use relay_core::{TenantConfig, TenantMap};
use std::sync::Arc;
use user_store::UserStore;

use crate::mocks::{MemoryUserStore, MockDispatcher};

/// Content id with a tenant entry in the test credential map.
pub const KNOWN_CONTENT_ID: &str = "known_shop";

pub fn known_tenant() -> TenantConfig {
    TenantConfig {
        pixel_id: "111222333".into(),
        access_token: "tenant-token".into(),
        test_code: Some("TEST1".into()),
    }
}

pub fn ambient_tenant() -> TenantConfig {
    TenantConfig {
        pixel_id: "999000999".into(),
        access_token: "ambient-token".into(),
        test_code: None,
    }
}

/// Test context with mock dispatcher and in-memory user store.
///
/// Exercises the production code paths end to end: the real router, the
/// real handler, real normalization. Only the Conversions API transport
/// and Postgres are swapped for their trait mocks; the geo enricher runs
/// without a database and answers with the empty location.
pub struct TestContext {
    pub router: Router,
    pub dispatcher: Arc<MockDispatcher>,
    pub users: Arc<MemoryUserStore>,
}

impl TestContext {
    pub fn new() -> Self {
        let dispatcher = Arc::new(MockDispatcher::new());
        let users = Arc::new(MemoryUserStore::new());

        let tenants: TenantMap = [(KNOWN_CONTENT_ID.to_string(), known_tenant())]
            .into_iter()
            .collect();

        let state = AppState::new(
            dispatcher.clone() as Arc<dyn ConversionsClient>,
            users.clone() as Arc<dyn UserStore>,
            Arc::new(GeoEnricher::unavailable()),
            Arc::new(tenants),
            ambient_tenant(),
        );

        Self {
            router: router(state),
            dispatcher,
            users,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
