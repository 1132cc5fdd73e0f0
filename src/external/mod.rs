pub mod alpaca;
pub mod alphavantage;
pub mod broker;
pub mod finnhub;
pub mod ml_service;
pub mod narrative;
pub mod sectors;
pub mod value_service;
