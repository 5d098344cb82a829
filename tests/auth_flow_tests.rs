//! tests/auth_flow_tests.rs
//!
//! Login, guarded access and logout over the HTTP surface.
mod common;

use axum::http::StatusCode;
use common::{bearer, login, register, setup_test_app};
use serde_json::{json, Value};

#[tokio::test(flavor = "current_thread")]
async fn test_full_session_lifecycle() {
    let app = setup_test_app();
    let server = &app.server;

    // unknown user
    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "a@x.com", "password": "secret" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "InvalidCredentials");

    let user_id = register(server, "a@x.com", "secret").await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "a@x.com", "password": "secret" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 64);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);

    let response = server
        .get("/api/v1/users/me")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["_id"], user_id.as_str());
    assert_eq!(body["email"], "a@x.com");
    assert!(body.get("password").is_none());

    let response = server
        .delete("/api/v1/auth/logout")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    let response = server
        .get("/api/v1/users/me")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test(flavor = "current_thread")]
async fn test_logout_without_header_is_missing_token() {
    let app = setup_test_app();

    let response = app.server.delete("/api/v1/auth/logout").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "MissingToken");
}

#[tokio::test(flavor = "current_thread")]
async fn test_logout_with_unknown_token_is_invalid_token() {
    let app = setup_test_app();

    let response = app
        .server
        .delete("/api/v1/auth/logout")
        .add_header("Authorization", bearer("deadbeef"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "InvalidToken");
}

#[tokio::test(flavor = "current_thread")]
async fn test_wrong_password_matches_unknown_email() {
    let app = setup_test_app();
    register(&app.server, "a@x.com", "secret").await;

    let wrong_password = app
        .server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "a@x.com", "password": "wrong" }))
        .await;
    let unknown_email = app
        .server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "nobody@x.com", "password": "secret" }))
        .await;

    assert_eq!(wrong_password.status_code(), unknown_email.status_code());
    let a: Value = wrong_password.json();
    let b: Value = unknown_email.json();
    assert_eq!(a, b);
    assert!(app.sessions.is_empty().await);
}

#[tokio::test(flavor = "current_thread")]
async fn test_email_lookup_is_case_sensitive() {
    let app = setup_test_app();
    register(&app.server, "a@x.com", "secret").await;

    let response = app
        .server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "A@X.com", "password": "secret" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "current_thread")]
async fn test_malformed_login_bodies() {
    let app = setup_test_app();

    let cases = [
        json!({ "email": "a@x.com" }),
        json!({ "password": "secret" }),
        json!({ "email": "", "password": "secret" }),
        json!({ "email": "a@x.com", "password": "" }),
    ];
    for body in cases {
        let response = app.server.post("/api/v1/auth/login").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "MalformedRequest");
    }

    let response = app
        .server
        .post("/api/v1/auth/login")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "current_thread")]
async fn test_concurrent_sessions_are_independent() {
    let app = setup_test_app();
    register(&app.server, "a@x.com", "secret").await;

    let first = login(&app.server, "a@x.com", "secret").await;
    let second = login(&app.server, "a@x.com", "secret").await;
    assert_ne!(first, second);

    app.server
        .delete("/api/v1/auth/logout")
        .add_header("Authorization", bearer(&first))
        .await
        .assert_status_ok();

    app.server
        .get("/api/v1/users/me")
        .add_header("Authorization", bearer(&second))
        .await
        .assert_status_ok();
}

#[tokio::test(flavor = "current_thread")]
async fn test_bearer_scheme_variants() {
    let app = setup_test_app();
    register(&app.server, "a@x.com", "secret").await;
    let token = login(&app.server, "a@x.com", "secret").await;

    app.server
        .get("/api/v1/users/me")
        .add_header("Authorization", format!("bearer {}", token))
        .await
        .assert_status_ok();

    app.server
        .get("/api/v1/users/me")
        .add_header("Authorization", format!("Basic {}", token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .get("/api/v1/users/me")
        .add_header("Authorization", token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "current_thread")]
async fn test_session_store_outage_is_service_unavailable() {
    let app = setup_test_app();
    register(&app.server, "a@x.com", "secret").await;
    let token = login(&app.server, "a@x.com", "secret").await;

    app.sessions.set_offline(true);

    let response = app
        .server
        .get("/api/v1/users/me")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"], "ServiceUnavailable");

    let response = app
        .server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "a@x.com", "password": "secret" }))
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let response = app
        .server
        .delete("/api/v1/auth/logout")
        .add_header("Authorization", bearer(&token))
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test(flavor = "current_thread")]
async fn test_document_store_outage_on_login() {
    let app = setup_test_app();
    register(&app.server, "a@x.com", "secret").await;

    app.documents.set_offline(true);

    let response = app
        .server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "a@x.com", "password": "secret" }))
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"], "ServiceUnavailable");
}

#[tokio::test(flavor = "current_thread")]
async fn test_passwords_longer_than_72_bytes_are_refused() {
    let app = setup_test_app();
    let prefix = "a".repeat(72);

    let response = app
        .server
        .post("/api/v1/users")
        .json(&json!({ "email": "a@x.com", "password": format!("{}X", prefix) }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "MalformedRequest");

    register(&app.server, "a@x.com", &prefix).await;

    let response = app
        .server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "a@x.com", "password": format!("{}Y", prefix) }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.sessions.is_empty().await);

    login(&app.server, "a@x.com", &prefix).await;
}
