use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::external::broker::BrokerError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Broker error: {0}")]
    Broker(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Rate limited by external provider")]
    RateLimited,
    #[error("External error: {0}")]
    External(String),
}

/// Every error leaves as `{ "error": <message> }` so the frontend has one
/// envelope to parse regardless of status code.
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    headers,
                    Json(json!({ "error": "Rate limited" })),
                )
                    .into_response()
            }
            AppError::Broker(msg) => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": msg }))).into_response()
            }
            AppError::External(msg) => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}

impl From<BrokerError> for AppError {
    fn from(value: BrokerError) -> Self {
        AppError::Broker(value.to_string())
    }
}
