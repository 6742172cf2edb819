//! End-to-end tests for the event relay pipeline.
//!
//! These drive the real router and handler with a mock dispatcher and an
//! in-memory user store: POST /events/send → normalize → MockDispatcher.
//! The geo enricher runs without a database, so every location resolves
//! to the empty location, exactly like a deployment with no mmdb file.

use axum_test::TestServer;
use integration_tests::fixtures::{event_payload, with_field, FIXTURE_USER_ID};
use integration_tests::setup::{ambient_tenant, known_tenant, TestContext, KNOWN_CONTENT_ID};
use relay_core::StandardEvent;
use serde_json::json;
use user_store::UserStore;

#[tokio::test]
async fn init_returns_resolved_identity_and_no_event() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/events/send")
        .json(&event_payload("Init", KNOWN_CONTENT_ID))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    // No geo database: every geo field is null, never partially filled.
    assert!(body["ct"].is_null());
    assert!(body["st"].is_null());
    assert!(body["zp"].is_null());
    assert!(body["country"].is_null());

    // Init echoes the caller-supplied id; the server never generates one.
    assert_eq!(body["external_id"], FIXTURE_USER_ID);
    assert_eq!(body["fbp"], "fb.1.1700000000.1234567890");

    // Nothing dispatched, nobody recorded.
    assert_eq!(ctx.dispatcher.submission_count(), 0);
    assert_eq!(ctx.users.user_count(), 0);
}

#[tokio::test]
async fn init_without_user_id_echoes_empty() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let mut payload = event_payload("Init", KNOWN_CONTENT_ID);
    payload.as_object_mut().unwrap().remove("userId");

    let response = server.post("/events/send").json(&payload).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["external_id"], "");
}

#[tokio::test]
async fn scroll_event_remaps_under_ambient_credentials() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // contentId not present in the tenant map.
    let response = server
        .post("/events/send")
        .json(&event_payload("Scroll_50", "shop123"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let event_id = body["eventID"].as_str().expect("eventID missing");
    assert!(!event_id.is_empty());

    let captured = ctx.dispatcher.captured();
    assert_eq!(captured.len(), 1);
    let (tenant, event) = &captured[0];

    // Tenant miss fell back to the ambient credentials.
    assert_eq!(tenant, &ambient_tenant());

    // Submitted under the remapped canonical name, original preserved.
    assert_eq!(event.event_name, StandardEvent::ViewContent);
    assert_eq!(event.custom_data.original_event.as_deref(), Some("Scroll_50"));

    // The id handed back to the caller is the dispatched event's id.
    assert_eq!(event.event_id, event_id);
}

#[tokio::test]
async fn known_tenant_credentials_are_threaded_through() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/events/send")
        .json(&event_payload("Lead", KNOWN_CONTENT_ID))
        .await;

    response.assert_status_ok();
    let captured = ctx.dispatcher.captured();
    let (tenant, _) = &captured[0];
    assert_eq!(tenant, &known_tenant());
}

#[tokio::test]
async fn purchase_preserves_value_currency_and_content_ids() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = with_field(
        with_field(
            with_field(
                event_payload("Purchase", "shop123"),
                "value",
                json!(99.99),
            ),
            "currency",
            json!("BRL"),
        ),
        "content_ids",
        json!(["sku-1", "sku-2"]),
    );

    let response = server.post("/events/send").json(&payload).await;

    response.assert_status_ok();
    let captured = ctx.dispatcher.captured();
    let (_, event) = &captured[0];

    assert_eq!(event.event_name, StandardEvent::Purchase);
    assert_eq!(event.custom_data.value, Some(99.99));
    assert_eq!(event.custom_data.currency.as_deref(), Some("BRL"));
    assert_eq!(event.custom_data.content_ids, vec!["sku-1", "sku-2"]);
    // Purchase is a standard event: no original_event marker.
    assert_eq!(event.custom_data.original_event, None);
}

#[tokio::test]
async fn empty_content_ids_fall_back_to_content_id() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = with_field(
        event_payload("AddToCart", "shop123"),
        "content_ids",
        json!(["", "  "]),
    );

    let response = server.post("/events/send").json(&payload).await;

    response.assert_status_ok();
    let captured = ctx.dispatcher.captured();
    let (_, event) = &captured[0];
    assert_eq!(event.custom_data.content_ids, vec!["shop123"]);
}

#[tokio::test]
async fn page_view_records_user_once_keeping_first_snapshot() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let first = with_field(
        event_payload("PageView", "shop123"),
        "em",
        json!("first@example.com"),
    );
    server.post("/events/send").json(&first).await.assert_status_ok();

    let second = with_field(
        event_payload("PageView", "shop123"),
        "em",
        json!("second@example.com"),
    );
    server.post("/events/send").json(&second).await.assert_status_ok();

    assert_eq!(ctx.users.user_count(), 1);
    let record = ctx
        .users
        .find_by_external_id(FIXTURE_USER_ID)
        .await
        .unwrap()
        .expect("user should be recorded");
    assert_eq!(record.email, "first@example.com");
    assert_eq!(record.content_id, "shop123");

    // Both page views were still dispatched.
    assert_eq!(ctx.dispatcher.submission_count(), 2);
}

#[tokio::test]
async fn view_home_does_not_record_a_user() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/events/send")
        .json(&event_payload("ViewHome", "shop123"))
        .await;

    response.assert_status_ok();
    assert_eq!(ctx.users.user_count(), 0);

    // ViewHome still dispatches, remapped onto PageView.
    let captured = ctx.dispatcher.captured();
    let (_, event) = &captured[0];
    assert_eq!(event.event_name, StandardEvent::PageView);
    assert_eq!(event.custom_data.original_event.as_deref(), Some("ViewHome"));
}

#[tokio::test]
async fn page_view_without_user_id_skips_recording() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let mut payload = event_payload("PageView", "shop123");
    payload.as_object_mut().unwrap().remove("userId");

    server.post("/events/send").json(&payload).await.assert_status_ok();
    assert_eq!(ctx.users.user_count(), 0);
}

#[tokio::test]
async fn form_encoded_body_is_accepted() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/events/send")
        .content_type("application/x-www-form-urlencoded")
        .bytes("eventType=Init&userId=form-user&contentId=shop123".into())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["external_id"], "form-user");
}

#[tokio::test]
async fn personal_data_is_normalized_before_dispatch() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let payload = with_field(
        with_field(
            with_field(
                event_payload("Lead", "shop123"),
                "em",
                json!(" Maria@Example.COM "),
            ),
            "fn",
            json!("  Maria "),
        ),
        "ph",
        json!("+55 (11) 98765-4321"),
    );

    server.post("/events/send").json(&payload).await.assert_status_ok();

    let captured = ctx.dispatcher.captured();
    let (_, event) = &captured[0];
    assert_eq!(event.user_data.email.as_deref(), Some("maria@example.com"));
    assert_eq!(event.user_data.first_name.as_deref(), Some("maria"));
    assert_eq!(event.user_data.phone.as_deref(), Some("5511987654321"));
}
