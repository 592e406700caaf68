use std::time::Duration;

use hyper::StatusCode;

use crate::database::{Session, User};
use crate::global::GlobalDb;
use crate::tests::utils::TestHarness;

#[tokio::test]
async fn forms_publish_their_field_contract() {
    let mut harness = TestHarness::new().await;

    for path in ["/register", "/login"] {
        let response = harness.get(path).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = TestHarness::body_json(response).await;
        assert_eq!(body["fields"], serde_json::json!(["username", "password"]));
    }

    harness.teardown().await;
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let mut harness = TestHarness::new().await;

    let response = harness.post_form("/register", &[("username", "alice"), ("password", "pw1")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/login");

    let response = harness.post_form("/register", &[("username", "alice"), ("password", "other")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/register");

    let body = TestHarness::body_json(harness.get("/register").await).await;
    assert_eq!(body["message"], "Usuário já existe!");

    harness.teardown().await;
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let mut harness = TestHarness::new().await;

    harness.post_form("/register", &[("username", "alice"), ("password", "pw1")]).await;

    let response = harness.post_form("/login", &[("username", "alice"), ("password", "wrong")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/login");
    assert!(!harness.has_session());

    let response = harness.post_form("/login", &[("username", "nobody"), ("password", "pw1")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(!harness.has_session());

    let body = TestHarness::body_json(harness.get("/login").await).await;
    assert_eq!(body["message"], "Usuário ou senha inválidos!");

    harness.teardown().await;
}

#[tokio::test]
async fn usernames_are_case_insensitive() {
    let mut harness = TestHarness::new().await;

    harness.post_form("/register", &[("username", "Alice"), ("password", "pw1")]).await;

    let response = harness.post_form("/login", &[("username", "ALICE"), ("password", "pw1")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/");
    assert!(harness.has_session());

    harness.teardown().await;
}

#[tokio::test]
async fn logout_ends_the_session() {
    let mut harness = TestHarness::new().await;
    harness.register_and_login("alice", "pw1").await;

    let response = harness.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = harness.get("/logout").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/login");
    assert!(!harness.has_session());

    let response = harness.get("/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/login");

    harness.teardown().await;
}

#[tokio::test]
async fn expired_sessions_redirect_to_login() {
    let mut harness = TestHarness::with_config(|config| {
        config.session.validity_secs = 1;
    })
    .await;
    harness.register_and_login("alice", "pw1").await;

    let response = harness.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(1200)).await;

    // The stale cookie acts like no cookie: a redirect, not a 401.
    let response = harness.get("/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/login");

    harness.teardown().await;
}

#[tokio::test]
async fn login_purges_expired_sessions() {
    let mut harness = TestHarness::new().await;

    harness.post_form("/register", &[("username", "alice"), ("password", "pw1")]).await;

    let db = harness.global.db().clone();
    let user = User::by_username(&db, "alice").await.unwrap().unwrap();
    Session::create(&db, user.id, chrono::Duration::seconds(-1)).await.unwrap();

    let response = harness.post_form("/login", &[("username", "alice"), ("password", "pw1")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let sessions = sqlx::query_as::<_, Session>("SELECT * FROM sessions")
        .fetch_all(db.as_ref())
        .await
        .unwrap();
    assert_eq!(sessions.len(), 1);
    assert!(sessions[0].is_valid());

    harness.teardown().await;
}

#[tokio::test]
async fn invalid_usernames_are_rejected() {
    let mut harness = TestHarness::new().await;

    let response = harness.post_form("/register", &[("username", "no spaces"), ("password", "pw1")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/register");

    let response = harness.post_form("/login", &[("username", "no spaces"), ("password", "pw1")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/login");
    assert!(!harness.has_session());

    harness.teardown().await;
}
