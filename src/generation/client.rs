//! Outbound client for the text-generation provider.
//!
//! A provider-level failure (transport, auth, quota) is logged with context
//! and re-signaled as the coarse `ApiError::Generation`; callers never see
//! raw provider detail. One attempt per request, no retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::GenerationConfig;
use crate::error::ApiError;

/// Boundary to the external text-generation provider. Constructed once at
/// startup and shared through `AppState`.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send one prompt and return the raw completion text.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        premium: bool,
    ) -> Result<String, ApiError>;
}

/// OpenAI-compatible chat-completions client.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model_basic: String,
    model_premium: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiClient {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model_basic: config.model_basic.clone(),
            model_premium: config.model_premium.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Premium callers get the premium model tier.
    fn model_for(&self, premium: bool) -> &str {
        if premium {
            &self.model_premium
        } else {
            &self.model_basic
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        premium: bool,
    ) -> Result<String, ApiError> {
        let model = self.model_for(premium);
        let body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        info!(%model, "requesting completion");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "generation request failed");
                ApiError::Generation
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(%status, detail, "provider returned error");
            return Err(ApiError::Generation);
        }

        let completion: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "malformed provider response");
            ApiError::Generation
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                error!("provider response contained no choices");
                ApiError::Generation
            })?;

        info!("completion received");
        Ok(content)
    }
}
