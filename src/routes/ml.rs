use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tracing::{error, info};

use crate::errors::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/train", post(train_model))
}

pub async fn train_model(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    info!("POST /ml/train - Triggering model training");
    let result = state.scoring.train().await.map_err(|e| {
        error!("Training trigger failed: {}", e);
        AppError::External(e.to_string())
    })?;
    Ok(Json(result))
}
