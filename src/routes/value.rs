use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tracing::{error, info};

use crate::errors::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:symbol", get(get_value_score))
}

pub async fn get_value_score(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    info!("GET /value/{} - Fetching value score", symbol);

    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(AppError::Validation("Symbol cannot be empty".into()));
    }

    let score = state.values.get_score(symbol).await.map_err(|e| {
        error!("Failed to fetch value score for {}: {}", symbol, e);
        AppError::External(e.to_string())
    })?;
    Ok(Json(score))
}
