// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use carbon_cal::config::{CompletionConfig, Config};
use carbon_cal::db::MemoryStore;
use carbon_cal::routes::create_router;
use carbon_cal::AppState;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A local stand-in for the chat-completions endpoint.
#[allow(dead_code)]
pub struct FakeCompletion {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<(HeaderMap, Value)>>>,
}

#[allow(dead_code)]
impl FakeCompletion {
    /// Number of requests the fake has served.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Headers and JSON body of the most recent request.
    pub fn last_request(&self) -> Option<(HeaderMap, Value)> {
        self.last_request.lock().unwrap().clone()
    }
}

/// Wrap message content in a chat-completions response envelope.
#[allow(dead_code)]
pub fn completion_envelope(content: Value) -> String {
    json!({
        "id": "gen-test",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

/// Serve `body` with `status` for every POST to `/chat/completions`.
#[allow(dead_code)]
pub async fn spawn_fake_completion(status: StatusCode, body: String) -> FakeCompletion {
    let hits = Arc::new(AtomicUsize::new(0));
    let last_request = Arc::new(Mutex::new(None));

    let handler = {
        let hits = hits.clone();
        let last_request = last_request.clone();
        move |headers: HeaderMap, Json(request): Json<Value>| {
            let hits = hits.clone();
            let last_request = last_request.clone();
            let body = body.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                *last_request.lock().unwrap() = Some((headers, request));
                (status, body)
            }
        }
    };

    let app = Router::new().route("/chat/completions", post(handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeCompletion {
        base_url: format!("http://{}", addr),
        hits,
        last_request,
    }
}

/// Completion settings pointing at `base_url` with a test key.
#[allow(dead_code)]
pub fn completion_config(base_url: &str) -> CompletionConfig {
    CompletionConfig {
        api_key: Some("test-key".to_string()),
        base_url: base_url.to_string(),
        ..CompletionConfig::default()
    }
}

/// Create a test app backed by an in-memory store.
/// Returns the router, the shared state and the store.
#[allow(dead_code)]
pub fn create_test_app(config: Config) -> (axum::Router, Arc<AppState>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(config, store.clone()).expect("Failed to build state"));
    (create_router(state.clone()), state, store)
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
