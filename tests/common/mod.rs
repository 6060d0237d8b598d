// SPDX-License-Identifier: MIT

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use serde_json::Value;
use zengym::config::Config;
use zengym::routes::create_router;
use zengym::services::{ActivityAggregator, OidcClient, ZenAssistant};
use zengym::storage::{MemoryStorage, Storage};
use zengym::AppState;

/// Create a test app backed by a fresh in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let aggregator = ActivityAggregator::new(storage.clone());
    let assistant = ZenAssistant::new(None).expect("assistant"); // fallback responses only
    let oidc = OidcClient::new(&config);

    let state = Arc::new(AppState {
        config,
        storage,
        aggregator,
        assistant,
        oidc,
    });

    (create_router(state.clone()), state)
}

/// Create a session JWT for a test user.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    zengym::middleware::auth::create_jwt(user_id, signing_key).expect("JWT creation")
}

/// Build an authenticated JSON request.
#[allow(dead_code)]
pub fn authed_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("JSON body")
}
