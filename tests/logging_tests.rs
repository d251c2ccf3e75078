//! Request logging must not leak session tokens

mod common;

use axum::http::StatusCode;
use serde_json::json;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;
use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

use common::*;
use primergpt_server::constants::DEFAULT_LOG_FILTER;
use primergpt_server::generation::MockBackend;
use primergpt_server::security::issue_token;

/// In-memory log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn test_request_logs_omit_tokens() {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(DEFAULT_LOG_FILTER))
        .with_writer(buffer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let temp_dir = TempDir::new().unwrap();
    let backend = Arc::new(MockBackend::new(Duration::ZERO, Duration::ZERO));
    let app = create_test_app(&temp_dir, backend).await;

    let token = issue_token(1, TEST_SECRET).unwrap();

    // Socket handshake carries the token in the query
    app.clone()
        .oneshot(make_get_request(&format!("/ws?token={}", token)))
        .await
        .unwrap();

    // Authenticated HTTP request carries it in the cookie
    let response = app
        .oneshot(make_authed_post_request(
            "/api/generate",
            json!({ "prompt": "hello" }).to_string(),
            &format!("token={}", token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let logs = buffer.contents();
    assert!(logs.contains("path=/ws"), "request spans were not captured: {}", logs);
    assert!(logs.contains("path=/api/generate"));
    assert!(!logs.contains(&token));
    assert!(!logs.contains("token="));
}
