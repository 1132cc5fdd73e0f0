pub mod advisor_service;
pub mod analysis_service;
pub mod dashboard_service;
pub mod order_service;
pub mod position_service;
pub mod scoring_service;
