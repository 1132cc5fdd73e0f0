mod app;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::external::alpaca::AlpacaBroker;
use crate::external::alphavantage::AlphaVantageSectors;
use crate::external::broker::BrokerApi;
use crate::external::finnhub::FinnhubQuotes;
use crate::external::ml_service::{MlServiceClient, ScoringProvider};
use crate::external::narrative::{NarrativeGenerator, OpenAiNarrator};
use crate::external::sectors::SectorProvider;
use crate::external::value_service::ValueServiceClient;
use crate::logging::{init_logging, LoggingConfig};
use crate::models::AnalysisThresholds;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let broker: Arc<dyn BrokerApi> = Arc::new(
        AlpacaBroker::from_env()
            .expect("Failed to create AlpacaBroker (check ALPACA_API_KEY / ALPACA_API_SECRET)"),
    );
    let sectors: Arc<dyn SectorProvider> = Arc::new(
        AlphaVantageSectors::from_env()
            .expect("Failed to create AlphaVantageSectors (check ALPHAVANTAGE_API_KEY)"),
    );
    let scoring: Arc<dyn ScoringProvider> = Arc::new(MlServiceClient::from_env());
    let narrator: Arc<dyn NarrativeGenerator> = Arc::new(
        OpenAiNarrator::from_env().expect("Failed to create OpenAiNarrator (check OPENAI_API_KEY)"),
    );
    let quotes = Arc::new(
        FinnhubQuotes::from_env().expect("Failed to create FinnhubQuotes (check FINNHUB_API_KEY)"),
    );
    let values = Arc::new(
        ValueServiceClient::from_env()
            .expect("Failed to create ValueServiceClient (check VALUE_SERVICE_BASE_URL)"),
    );

    let state = AppState {
        broker,
        sectors,
        scoring,
        narrator,
        quotes,
        values,
        thresholds: AnalysisThresholds::default(),
    };

    let app = app::create_app(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Brokerdash backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
