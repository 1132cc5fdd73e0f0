use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::{Fill, OpenOrder, OrderRequest, PlacedOrder};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(place_order))
        .route("/open", get(open_orders))
        .route("/fills", get(recent_fills))
}

pub async fn place_order(
    State(state): State<AppState>,
    Json(input): Json<OrderRequest>,
) -> Result<Json<PlacedOrder>, AppError> {
    info!(
        "POST /orders - Placing {} {} x {}",
        input.side.as_str(),
        input.qty,
        input.symbol
    );
    let order = services::order_service::place_market_order(state.broker.as_ref(), input)
        .await
        .map_err(|e| {
            match &e {
                AppError::Validation(msg) => warn!("Rejected order: {}", msg),
                _ => error!("Order placement failed: {}", e),
            }
            e
        })?;
    Ok(Json(order))
}

pub async fn open_orders(State(state): State<AppState>) -> Result<Json<Vec<OpenOrder>>, AppError> {
    info!("GET /orders/open - Listing open orders");
    let orders = services::order_service::list_open_orders(state.broker.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to fetch open orders: {}", e);
            e
        })?;
    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
pub struct FillsQuery {
    #[serde(default = "default_fill_limit")]
    limit: u32,
}

fn default_fill_limit() -> u32 {
    10
}

pub async fn recent_fills(
    State(state): State<AppState>,
    Query(query): Query<FillsQuery>,
) -> Result<Json<Vec<Fill>>, AppError> {
    info!("GET /orders/fills - Listing {} recent fills", query.limit);
    let fills = services::order_service::list_recent_fills(state.broker.as_ref(), query.limit)
        .await
        .map_err(|e| {
            error!("Failed to fetch recent fills: {}", e);
            e
        })?;
    Ok(Json(fills))
}
