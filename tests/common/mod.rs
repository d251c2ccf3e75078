//! Helpers shared by the integration test binaries

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use primergpt_server::config::BackendKind;
use primergpt_server::db::JsonFileUserStore;
use primergpt_server::generation::{Generation, GenerationBackend, GenerationError};
use primergpt_server::{router, AppState, Config};

pub const TEST_SECRET: &str = "test-secret-key";

/// Create a test configuration rooted in a temporary directory
pub fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        environment: "test".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        users_path: temp_dir
            .path()
            .join("users.json")
            .to_string_lossy()
            .into_owned(),
        static_dir: temp_dir.path().join("public").to_string_lossy().into_owned(),
        allowed_origins: vec!["http://localhost:3001".to_string()],
        rate_limit_requests: 100,
        rate_limit_window_secs: 900,
        bcrypt_cost: 4,
        signup_resets_password: true,
        generation_backend: BackendKind::Mock,
        ollama_url: "http://127.0.0.1:1".to_string(),
        ollama_model: "mistral".to_string(),
        openai_base_url: "http://127.0.0.1:1".to_string(),
        openai_model: "gpt-4".to_string(),
        openai_api_key: None,
        mock_min_delay_ms: 0,
        mock_max_delay_ms: 0,
    }
}

/// Backend double that records every prompt it receives
pub struct RecordingBackend {
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
    reply: Option<String>,
}

impl RecordingBackend {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            reply: Some(text.to_string()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            reply: None,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GenerationBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Some(text) => Ok(Generation {
                text: text.clone(),
                total_duration: Some(42),
            }),
            None => Err(GenerationError::MalformedResponse("upstream down".to_string())),
        }
    }

    async fn health_check(&self) -> Result<(), GenerationError> {
        match self.reply {
            Some(_) => Ok(()),
            None => Err(GenerationError::MalformedResponse("upstream down".to_string())),
        }
    }
}

/// Build application state over a fresh user store
pub async fn create_test_state(config: Config, backend: Arc<dyn GenerationBackend>) -> AppState {
    let users = Arc::new(
        JsonFileUserStore::open(&config.users_path)
            .await
            .expect("Failed to open test user store"),
    );
    AppState::new(config, users, backend)
}

/// Create a test app router with the given backend
pub async fn create_test_app(temp_dir: &TempDir, backend: Arc<dyn GenerationBackend>) -> Router {
    router(create_test_state(test_config(temp_dir), backend).await)
}

/// Read the raw user records from the store file
pub fn read_users(temp_dir: &TempDir) -> Vec<Value> {
    let raw = std::fs::read_to_string(temp_dir.path().join("users.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

/// Parse response body as JSON
pub async fn body_to_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a POST request with JSON body
pub fn make_post_request(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// Create a POST request with JSON body and a session cookie
pub fn make_authed_post_request(uri: &str, body: String, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("cookie", cookie)
        .body(Body::from(body))
        .unwrap()
}

/// Create a GET request
pub fn make_get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Extract `token=<value>` from a response's Set-Cookie header
pub fn session_cookie<B>(response: &Response<B>) -> Option<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("token="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}
