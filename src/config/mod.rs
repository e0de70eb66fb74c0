//! Pipeline configuration
//!
//! The configuration is loaded once from an [`EnvVars`] snapshot and then
//! handed to the components that need it. Nothing below reads the process
//! environment directly.

pub mod env;
pub mod network;
pub mod settings;

use thiserror::Error;

pub use env::EnvVars;
pub use network::{AccountSource, NetworkProfile, Networks, DEFAULT_NETWORK};
pub use settings::{
    GasReporterConfig, OptimizerConfig, PipelineConfig, SolidityConfig, TestRunnerConfig,
    TypechainConfig,
};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid number in {key}: {value}")]
    InvalidNumber { key: String, value: String },
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),
}
