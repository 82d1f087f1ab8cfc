use axum::http::StatusCode;
use base64::{Engine, engine::general_purpose::URL_SAFE};
use serde_json::Value;

use leonlib_core::database::UsersRepository;

#[path = "support/mod.rs"]
mod support;
use support::{REJECTED_CODE, TEST_USER, build_test_app, location, page};

#[tokio::test]
async fn login_redirects_to_provider_with_fresh_state() {
    let app = build_test_app();

    let first = app.server.get("/auth/google/login").await;
    first.assert_status(StatusCode::SEE_OTHER);
    assert!(first.maybe_cookie("user-session").is_some());

    let first_url = location(&first);
    assert!(first_url.starts_with("https://idp.test/authorize?"));
    let state = first_url
        .split("state=")
        .nth(1)
        .and_then(|rest| rest.split('&').next())
        .unwrap();
    assert_eq!(URL_SAFE.decode(state).unwrap().len(), 32);

    let second = app.server.get("/ingresar").await;
    second.assert_status(StatusCode::SEE_OTHER);
    assert_ne!(location(&second), first_url);
}

#[tokio::test]
async fn callback_signs_the_user_in() {
    let app = build_test_app();

    let response = app
        .server
        .get("/auth/callback")
        .add_query_param("code", "valid-code")
        .await;
    response.assert_status_ok();
    let page_after_sign_in = page(&response);
    assert_eq!(page_after_sign_in["page"], "index");
    assert_eq!(page_after_sign_in["logged_in"], true);

    let user = app.library.get_user(TEST_USER).await.unwrap().unwrap();
    assert_eq!(user.email, "leon@example.com");
    assert_eq!(user.oauth_identifier, "Google");

    assert_eq!(page(&app.server.get("/").await)["logged_in"], true);
}

#[tokio::test]
async fn signing_in_twice_keeps_one_user() {
    let app = build_test_app();
    app.sign_in().await;
    app.sign_in().await;

    let user = app.library.get_user(TEST_USER).await.unwrap();
    assert!(user.is_some());
}

#[tokio::test]
async fn callback_without_code_is_rejected() {
    let app = build_test_app();
    let response = app.server.get("/auth/callback").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Missing authorization code");
}

#[tokio::test]
async fn provider_failure_leaves_session_signed_out() {
    let app = build_test_app();
    let response = app
        .server
        .get("/auth/callback")
        .add_query_param("code", REJECTED_CODE)
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    assert_eq!(page(&app.server.get("/").await)["logged_in"], false);
    assert!(app.library.get_user(TEST_USER).await.unwrap().is_none());
}

#[tokio::test]
async fn user_store_failure_leaves_session_signed_out() {
    let app = build_test_app();
    app.library.set_failing(true);

    app.server
        .get("/auth/callback")
        .add_query_param("code", "valid-code")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    app.library.set_failing(false);
    assert_eq!(page(&app.server.get("/").await)["logged_in"], false);
}
