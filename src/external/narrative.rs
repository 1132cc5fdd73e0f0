use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::Narrative;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4.1-mini";

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("narrative request timed out")]
    Timeout,

    #[error("narrative provider rate limit exceeded")]
    RateLimited,

    #[error("network error: {0}")]
    Network(String),

    #[error("narrative API error: {0}")]
    Api(String),

    #[error("invalid narrative response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Narrative, NarrativeError>;
}

pub struct OpenAiNarrator {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiNarrator {
    pub fn from_env() -> Result<Self, NarrativeError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| NarrativeError::Api("OPENAI_API_KEY not set".into()))?;
        let model = std::env::var("OPENAI_MODEL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self::new(api_key, model))
    }

    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            model,
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    // String in the classic API, an array of typed parts in newer ones.
    content: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    total_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

#[async_trait]
impl NarrativeGenerator for OpenAiNarrator {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Narrative, NarrativeError> {
        let request = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            max_tokens: 500,
            temperature: 0.7,
        };

        debug!("Requesting narrative from model {}", self.model);

        let resp = self
            .client
            .post(OPENAI_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NarrativeError::Timeout
                } else {
                    NarrativeError::Network(e.to_string())
                }
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NarrativeError::RateLimited);
        }
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NarrativeError::Api(format!("HTTP {}: {}", status, body)));
        }

        let body = resp
            .json::<OpenAiResponse>()
            .await
            .map_err(|e| NarrativeError::InvalidResponse(e.to_string()))?;

        let text = body
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .and_then(extract_message_text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                NarrativeError::InvalidResponse("no message content in response".into())
            })?;

        let usage = body.usage.as_ref();

        Ok(Narrative {
            text,
            model: body.model.or_else(|| Some(self.model.clone())),
            total_tokens: usage.and_then(|u| u.total_tokens),
            completion_tokens: usage.and_then(|u| u.completion_tokens),
            generated_at: Utc::now(),
        })
    }
}

/// Message content is a plain string in the classic chat API and an array of
/// `{"type": "text", "text": ...}` parts in newer ones; non-text parts are
/// skipped.
fn extract_message_text(content: &Value) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => {
            let text: Vec<&str> = parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect();
            if text.is_empty() {
                None
            } else {
                Some(text.join(""))
            }
        }
        _ => None,
    }
}
