pub mod clients;
pub mod config;
pub mod content;
pub mod error;
pub mod models;
pub mod processor;
pub mod telemetry;
pub mod utils;
pub mod validation;
pub mod worker;
