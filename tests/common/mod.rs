//! Shared helpers for integration tests
#![allow(dead_code)]

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use socialplace_api::api::{ApiServer, AppState};
use socialplace_api::auth::{AuthConfig, MemorySessionStore};
use socialplace_api::storage::MemoryDocumentStore;
use std::sync::Arc;

pub struct TestApp {
    pub server: TestServer,
    pub documents: MemoryDocumentStore,
    pub sessions: MemorySessionStore,
}

/// Router over in-memory stores with a cheap bcrypt cost
pub fn setup_test_app() -> TestApp {
    let documents = MemoryDocumentStore::new();
    let sessions = MemorySessionStore::new();
    let auth = AuthConfig {
        token_ttl_secs: 3600,
        bcrypt_cost: 4,
    };

    let state = AppState::new(
        Arc::new(documents.clone()),
        Arc::new(sessions.clone()),
        &auth,
    )
    .unwrap();
    let api = ApiServer::new(state, "127.0.0.1".to_string(), 0, "*".to_string());
    let server = TestServer::new(api.create_router().unwrap()).unwrap();

    TestApp {
        server,
        documents,
        sessions,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Register a user and return its id
pub async fn register(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/v1/users")
        .json(&json!({ "email": email, "password": password }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["_id"].as_str().unwrap().to_string()
}

/// Log in and return the token
pub async fn login(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["token"].as_str().unwrap().to_string()
}
