use axum::routing::get;
use axum::Router;
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

async fn health_check() -> &'static str {
    info!("GET /health - Liveness check");
    "OK"
}
