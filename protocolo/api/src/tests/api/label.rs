use hyper::StatusCode;

use crate::delivery::DeliveryMode;
use crate::tests::utils::TestHarness;

#[tokio::test]
async fn download_returns_a_pdf_attachment() {
    let mut harness = TestHarness::new().await;
    harness.register_and_login("alice", "pw1").await;

    harness
        .post_form("/add", &[("nome", "Maria"), ("assunto", "Solicitação de alvará")])
        .await;

    let response = harness.get("/print/pdf/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "application/pdf");
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"protocolo-1.pdf\""
    );

    let bytes = TestHarness::body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF"));
    assert!(String::from_utf8_lossy(&bytes).contains("Nome: Maria"));

    harness.teardown().await;
}

#[tokio::test]
async fn unknown_record_is_not_found() {
    let mut harness = TestHarness::new().await;
    harness.register_and_login("alice", "pw1").await;

    for path in ["/print/pdf/99", "/print/direct/99"] {
        let response = harness.get(path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    harness.teardown().await;
}

#[tokio::test]
async fn other_users_records_are_hidden() {
    let mut harness = TestHarness::new().await;

    harness.register_and_login("alice", "pw1").await;
    harness.post_form("/add", &[("nome", "Maria"), ("assunto", "Solicitação")]).await;
    harness.get("/logout").await;

    harness.register_and_login("bob", "pw2").await;

    let response = harness.get("/print/pdf/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    harness.teardown().await;
}

#[tokio::test]
async fn direct_print_in_download_mode_streams_the_file() {
    let mut harness = TestHarness::with_config(|config| {
        config.label.dispatch = DeliveryMode::Download;
    })
    .await;
    harness.register_and_login("alice", "pw1").await;

    harness.post_form("/add", &[("nome", "Maria"), ("assunto", "Solicitação")]).await;

    let response = harness.get("/print/direct/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "application/pdf");

    let bytes = TestHarness::body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF"));

    harness.teardown().await;
}

#[tokio::test]
async fn printing_requires_a_session() {
    let mut harness = TestHarness::new().await;

    let response = harness.get("/print/pdf/1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/login");

    harness.teardown().await;
}
