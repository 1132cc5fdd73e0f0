use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::finnhub::QuoteError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:symbol", get(get_quote))
}

pub async fn get_quote(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    info!("GET /quotes/{} - Fetching quote", symbol);

    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(AppError::Validation("Symbol cannot be empty".into()));
    }

    let quote = state.quotes.get_quote(symbol).await.map_err(|e| match e {
        QuoteError::RateLimited => {
            warn!("Rate limited fetching quote for {}", symbol);
            AppError::RateLimited
        }
        other => {
            error!("Failed to fetch quote for {}: {}", symbol, other);
            AppError::External(other.to_string())
        }
    })?;
    Ok(Json(quote))
}
