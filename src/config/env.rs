//! Environment snapshot
//!
//! All environment lookups go through an [`EnvVars`] value so that the
//! configuration can be built from the process environment in the CLI and
//! from explicit pairs in tests.

use std::collections::HashMap;
use std::str::FromStr;

use super::ConfigError;

/// Expected native compiler version
pub const SOLC_VERSION: &str = "SOLC_VERSION";
/// Path to the native compiler binary
pub const SOLC_PATH: &str = "SOLC_PATH";
/// Optimizer run count
pub const SOLC_OPTIMIZER_RUNS: &str = "SOLC_OPTIMIZER_RUNS";
/// Directory of the default compiler cache
pub const SOLC_CACHE_DIR: &str = "SOLC_CACHE_DIR";
/// Gas reporter switch
pub const REPORT_GAS: &str = "REPORT_GAS";
/// Port of the local RPC endpoint
pub const RPC_PORT: &str = "RPC_PORT";
/// Seed phrase of the in-process test network
pub const TEST_MNEMONIC: &str = "TEST_MNEMONIC";
pub const RINKEBY_URL: &str = "RINKEBY_URL";
pub const RINKEBY_MNEMONIC: &str = "RINKEBY_MNEMONIC";
pub const GOERLI_URL: &str = "GOERLI_URL";
pub const GOERLI_MNEMONIC: &str = "GOERLI_MNEMONIC";

/// An immutable snapshot of environment variables
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build a snapshot from explicit key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a variable. Empty values count as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Look up a variable as an owned string
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    /// Whether a variable is set to a non-empty value
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Parse a numeric variable, falling back to `default` when unset
    pub fn parse_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber {
                    key: key.to_string(),
                    value: raw.to_string(),
                }),
        }
    }
}
