use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Generation, GenerationBackend, GenerationError};

/// Proxy to an OpenAI-compatible chat completions API
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiBackend {
    pub fn new(client: reqwest::Client, base_url: &str, model: &str, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        }
    }

    /// Pull `choices[0].message.content` out of a completion response
    fn extract_content(body: &Value) -> Option<String> {
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, prompt: &str) -> Result<Generation, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!("POST {} (model {})", url, self.model);

        let body: Value = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = Self::extract_content(&body).ok_or_else(|| {
            GenerationError::MalformedResponse("missing choices[0].message.content".to_string())
        })?;

        Ok(Generation::text(text))
    }

    async fn health_check(&self) -> Result<(), GenerationError> {
        self.client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
