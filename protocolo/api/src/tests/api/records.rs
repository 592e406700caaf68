use hyper::StatusCode;

use crate::tests::utils::TestHarness;

#[tokio::test]
async fn index_without_session_redirects_to_login() {
    let mut harness = TestHarness::new().await;

    let response = harness.get("/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/login");

    harness.teardown().await;
}

#[tokio::test]
async fn create_then_list_assigns_increasing_ids() {
    let mut harness = TestHarness::new().await;
    harness.register_and_login("alice", "pw1").await;

    for (nome, assunto) in [("Maria", "Solicitação de alvará"), ("João", "Requerimento de certidão")] {
        let response = harness.post_form("/add", &[("nome", nome), ("assunto", assunto)]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/");
    }

    let response = harness.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = TestHarness::body_json(response).await;
    let protocolos = body["protocolos"].as_array().unwrap();
    assert_eq!(protocolos.len(), 2);
    assert_eq!(protocolos[0]["id"], 1);
    assert_eq!(protocolos[0]["nome"], "Maria");
    assert_eq!(protocolos[0]["assunto"], "Solicitação de alvará");
    assert!(!protocolos[0]["created_at"].is_null());
    assert_eq!(protocolos[1]["id"], 2);
    assert_eq!(body["message"], "Protocolo adicionado com sucesso!");

    // The flash is one-shot.
    assert!(harness.flash_message().await.is_null());

    harness.teardown().await;
}

#[tokio::test]
async fn blank_fields_are_rejected() {
    let mut harness = TestHarness::new().await;
    harness.register_and_login("alice", "pw1").await;

    let response = harness.post_form("/add", &[("nome", "  "), ("assunto", "")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = harness.get("/").await;
    let body = TestHarness::body_json(response).await;
    assert_eq!(body["protocolos"].as_array().unwrap().len(), 0);
    assert_eq!(body["message"], "Preencha todos os campos!");

    harness.teardown().await;
}

#[tokio::test]
async fn delete_is_idempotent() {
    let mut harness = TestHarness::new().await;
    harness.register_and_login("alice", "pw1").await;

    harness.post_form("/add", &[("nome", "Maria"), ("assunto", "Solicitação")]).await;

    let response = harness.get("/delete/1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(harness.flash_message().await, "Protocolo excluído com sucesso!");

    let response = harness.get("/delete/1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(harness.flash_message().await, "Protocolo não encontrado!");

    let response = harness.get("/").await;
    let body = TestHarness::body_json(response).await;
    assert_eq!(body["protocolos"].as_array().unwrap().len(), 0);

    harness.teardown().await;
}

#[tokio::test]
async fn records_are_scoped_to_their_owner() {
    let mut harness = TestHarness::new().await;

    harness.register_and_login("alice", "pw1").await;
    harness.post_form("/add", &[("nome", "Maria"), ("assunto", "Solicitação")]).await;
    harness.get("/logout").await;

    harness.register_and_login("bob", "pw2").await;

    let response = harness.get("/").await;
    let body = TestHarness::body_json(response).await;
    assert_eq!(body["protocolos"].as_array().unwrap().len(), 0);

    // Deleting someone else's record is a no-op.
    harness.get("/delete/1").await;
    assert_eq!(harness.flash_message().await, "Protocolo não encontrado!");

    harness.get("/logout").await;
    harness.post_form("/login", &[("username", "alice"), ("password", "pw1")]).await;

    let response = harness.get("/").await;
    let body = TestHarness::body_json(response).await;
    assert_eq!(body["protocolos"].as_array().unwrap().len(), 1);

    harness.teardown().await;
}

#[tokio::test]
async fn user_ids_never_leak_into_listings() {
    let mut harness = TestHarness::new().await;
    harness.register_and_login("alice", "pw1").await;

    harness.post_form("/add", &[("nome", "Maria"), ("assunto", "Solicitação")]).await;

    let response = harness.get("/").await;
    let body = TestHarness::body_json(response).await;
    assert!(body["protocolos"][0].get("user_id").is_none());

    harness.teardown().await;
}
