use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::routes::{
    account, analysis, chat, dashboard, health, ml, orders, positions, quotes, value,
};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    // The dashboard frontend is served from a different origin in development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/account", account::router())
        .nest("/api/positions", positions::router())
        .nest("/api/dashboard", dashboard::router())
        .nest("/api/analysis", analysis::router())
        .nest("/api/orders", orders::router())
        .nest("/api/quotes", quotes::router())
        .nest("/api/value", value::router())
        .nest("/api/ml", ml::router())
        .nest("/api/chat", chat::router())
        .layer(cors)
        .with_state(state)
}
