use hyper::StatusCode;

use super::utils::TestHarness;

mod auth;
mod label;
mod records;

#[tokio::test]
async fn health_returns_ok() {
    let mut harness = TestHarness::new().await;

    let response = harness.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = TestHarness::body_json(response).await;
    assert_eq!(body["status"], "ok");

    harness.teardown().await;
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let mut harness = TestHarness::new().await;

    let response = harness.get("/no/such/route").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = TestHarness::body_json(response).await;
    assert_eq!(body["error"], "not_found");

    harness.teardown().await;
}
