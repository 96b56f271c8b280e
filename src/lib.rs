pub mod config;
pub mod engine;
pub mod input;
pub mod market_data;
pub mod report;
pub mod telemetry;
