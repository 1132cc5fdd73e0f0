use std::sync::Arc;

use crate::external::broker::BrokerApi;
use crate::external::finnhub::FinnhubQuotes;
use crate::external::ml_service::ScoringProvider;
use crate::external::narrative::NarrativeGenerator;
use crate::external::sectors::SectorProvider;
use crate::external::value_service::ValueServiceClient;
use crate::models::AnalysisThresholds;

#[derive(Clone)]
pub struct AppState {
    pub broker: Arc<dyn BrokerApi>,
    pub sectors: Arc<dyn SectorProvider>,
    pub scoring: Arc<dyn ScoringProvider>,
    pub narrator: Arc<dyn NarrativeGenerator>,
    pub quotes: Arc<FinnhubQuotes>,
    pub values: Arc<ValueServiceClient>,
    pub thresholds: AnalysisThresholds,
}
