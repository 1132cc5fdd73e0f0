use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Natural-language portfolio explanation. `text` is never empty: when the
/// language-model vendor is unavailable the advisor substitutes its apology
/// sentence instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub text: String,

    /// Model that produced the text, absent for the apology fallback.
    pub model: Option<String>,

    pub total_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,

    pub generated_at: DateTime<Utc>,
}

impl Narrative {
    /// Substitute narrative carrying only a fixed sentence.
    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
            total_tokens: None,
            completion_tokens: None,
            generated_at: Utc::now(),
        }
    }
}

/// Free-form question for the portfolio chat endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub reply: String,
}
