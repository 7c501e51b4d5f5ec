pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod roster;
pub mod scoring;
pub mod server;
pub mod service;
pub mod standings;
pub mod types;
