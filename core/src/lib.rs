pub mod aggregator;
pub mod backends;
pub mod config;
pub mod errors;
pub mod monitoring;
pub mod output;
pub mod state;
