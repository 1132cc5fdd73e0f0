use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::{ChatReply, ChatRequest};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(chat))
}

pub async fn chat(
    State(state): State<AppState>,
    Json(input): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    info!("POST /chat - Answering portfolio question");
    let reply = services::advisor_service::answer_question(
        state.narrator.as_ref(),
        state.broker.as_ref(),
        &input.message,
    )
    .await
    .map_err(|e| {
        match &e {
            AppError::Validation(msg) => warn!("Rejected chat request: {}", msg),
            _ => error!("Chat answer failed: {}", e),
        }
        e
    })?;
    Ok(Json(reply))
}
