use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{Generation, GenerationBackend, GenerationError};

/// Proxy to an Ollama server's `/api/generate`
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: Option<String>,
    total_duration: Option<u64>,
}

impl OllamaBackend {
    pub fn new(client: reqwest::Client, base_url: &str, model: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        tracing::debug!("POST {} (model {})", url, self.model);

        let body: OllamaResponse = self
            .client
            .post(&url)
            .json(&json!({
                "model": self.model,
                "prompt": prompt,
                "stream": false,
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = body.response.ok_or_else(|| {
            GenerationError::MalformedResponse("missing `response` field".to_string())
        })?;

        Ok(Generation {
            text,
            total_duration: body.total_duration,
        })
    }

    async fn health_check(&self) -> Result<(), GenerationError> {
        self.client
            .get(format!("{}/api/version", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
