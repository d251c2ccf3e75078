//! Text generation backends
//!
//! Exactly one backend answers each request. The configured backend is chosen
//! once at startup by [`build_backend`]; handlers only see the trait object.

pub mod mock;
pub mod ollama;
pub mod openai;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{BackendKind, Config};

/// A single reply from a backend
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    /// Upstream-reported processing time, when the backend provides one
    pub total_duration: Option<u64>,
}

impl Generation {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            total_duration: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short identifier used in logs and `/health`
    fn name(&self) -> &'static str;

    /// Produce one reply for the prompt; no streaming, no retries
    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError>;

    /// Probe whether the backend is reachable
    async fn health_check(&self) -> Result<(), GenerationError>;
}

/// Build the backend selected by configuration
///
/// Fails only if the HTTP client for a proxy backend cannot be constructed.
pub fn build_backend(config: &Config) -> Result<Arc<dyn GenerationBackend>, GenerationError> {
    let backend: Arc<dyn GenerationBackend> = match config.generation_backend {
        BackendKind::Mock => Arc::new(MockBackend::from_config(config)),
        BackendKind::Ollama => Arc::new(OllamaBackend::new(
            http_client()?,
            &config.ollama_url,
            &config.ollama_model,
        )),
        BackendKind::OpenAi => Arc::new(OpenAiBackend::new(
            http_client()?,
            &config.openai_base_url,
            &config.openai_model,
            config.openai_api_key.clone().unwrap_or_default(),
        )),
    };

    tracing::info!("Generation backend: {}", backend.name());
    Ok(backend)
}

/// Shared client for proxy backends; the transport's timeouts are the only ones enforced
fn http_client() -> Result<reqwest::Client, GenerationError> {
    Ok(reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()?)
}
