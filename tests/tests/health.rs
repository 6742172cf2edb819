//! Health endpoint tests.

use axum_test::TestServer;
use integration_tests::setup::TestContext;

#[tokio::test]
async fn health_reports_component_state() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    // The test context runs without a geo database: degraded, not down.
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["geo_database_loaded"], false);
    assert_eq!(body["user_store_connected"], true);
}

#[tokio::test]
async fn liveness_probe_is_ok() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health/live").await;
    response.assert_status_ok();
}
