//! Core domain types and logic.

pub mod ohlcv;
pub mod signal;
pub mod market_data;
pub mod volatility;
pub mod portfolio;
pub mod risk;
pub mod execution;
pub mod order_book;
pub mod metrics;
pub mod engine;
pub mod strategy;
pub mod config_validation;
pub mod error;
