mod analysis;
mod market;
mod narrative;
mod order;
mod outcome;
mod position;
mod scoring;

pub use analysis::{
    AnalysisReport, AnalysisThresholds, PerformanceSeries, PortfolioMetrics, SectorWeight,
    TopPosition,
};
pub use market::{DashboardView, Fill, LastTrade, MarketIndicators, OpenOrder};
pub use narrative::{ChatReply, ChatRequest, Narrative};
pub use order::{OrderRequest, OrderSide, PlacedOrder};
pub use outcome::StageOutcome;
pub use position::{AccountSummary, Position, UNKNOWN_SECTOR};
pub use scoring::{RiskScore, TrendDirection, TrendScore, UNKNOWN_RISK_LEVEL};
