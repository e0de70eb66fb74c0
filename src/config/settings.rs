//! Build, test and reporting settings passed through to the task framework

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::env::{
    EnvVars, REPORT_GAS, RPC_PORT, SOLC_CACHE_DIR, SOLC_OPTIMIZER_RUNS, SOLC_VERSION,
};
use super::network::{Networks, DEFAULT_RPC_PORT};
use super::ConfigError;
use crate::compiler::NativeCompiler;

/// Solidity version used when `SOLC_VERSION` is unset
pub const DEFAULT_SOLC_VERSION: &str = "0.8.0";
/// Optimizer runs when `SOLC_OPTIMIZER_RUNS` is unset
pub const DEFAULT_OPTIMIZER_RUNS: u32 = 200;
/// Test runner timeout in milliseconds
pub const TEST_TIMEOUT_MS: u64 = 300_000;
/// Location of the default compiler cache
pub const DEFAULT_CACHE_DIR: &str = ".toolchain/compilers";

/// Optimizer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizerConfig {
    pub enabled: bool,
    pub runs: u32,
}

/// Solidity compilation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolidityConfig {
    pub version: String,
    pub optimizer: OptimizerConfig,
}

impl Default for SolidityConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_SOLC_VERSION.to_string(),
            optimizer: OptimizerConfig {
                enabled: true,
                runs: DEFAULT_OPTIMIZER_RUNS,
            },
        }
    }
}

/// Gas usage reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GasReporterConfig {
    pub enabled: bool,
    pub show_method_sig: bool,
    pub currency: String,
    /// Gas price in gwei used for cost estimates
    pub gas_price: u64,
    pub only_called_methods: bool,
}

impl Default for GasReporterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            show_method_sig: true,
            currency: "USD".to_string(),
            gas_price: 205,
            only_called_methods: true,
        }
    }
}

/// Test runner settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRunnerConfig {
    pub timeout_ms: u64,
}

impl Default for TestRunnerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: TEST_TIMEOUT_MS,
        }
    }
}

/// Contract binding generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypechainConfig {
    pub target: String,
    /// Generate full-signature overloads like `deposit(uint256)` even
    /// when a function is not overloaded
    pub always_generate_overloads: bool,
}

impl Default for TypechainConfig {
    fn default() -> Self {
        Self {
            target: "ethers-v5".to_string(),
            always_generate_overloads: false,
        }
    }
}

/// The complete pipeline configuration
#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    pub networks: Networks,
    /// Port of the local RPC endpoint and dev server
    pub rpc_port: u16,
    pub solidity: SolidityConfig,
    pub native_compiler: NativeCompiler,
    pub compiler_cache_dir: PathBuf,
    pub gas_reporter: GasReporterConfig,
    pub test_runner: TestRunnerConfig,
    pub typechain: TypechainConfig,
    /// Account role name to signer index
    pub named_accounts: BTreeMap<String, usize>,
}

impl PipelineConfig {
    /// Load the configuration from an environment snapshot
    pub fn from_env(env: &EnvVars) -> Result<Self, ConfigError> {
        let solidity = SolidityConfig {
            version: env
                .get_string(SOLC_VERSION)
                .unwrap_or_else(|| DEFAULT_SOLC_VERSION.to_string()),
            optimizer: OptimizerConfig {
                enabled: true,
                runs: env.parse_or(SOLC_OPTIMIZER_RUNS, DEFAULT_OPTIMIZER_RUNS)?,
            },
        };

        let gas_reporter = GasReporterConfig {
            enabled: env.is_set(REPORT_GAS),
            ..Default::default()
        };

        let compiler_cache_dir = env
            .get(SOLC_CACHE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));

        let mut named_accounts = BTreeMap::new();
        named_accounts.insert("deployer".to_string(), 0);

        let config = Self {
            networks: Networks::from_env(env)?,
            rpc_port: env.parse_or(RPC_PORT, DEFAULT_RPC_PORT)?,
            solidity,
            native_compiler: NativeCompiler::from_env(env),
            compiler_cache_dir,
            gas_reporter,
            test_runner: TestRunnerConfig::default(),
            typechain: TypechainConfig::default(),
            named_accounts,
        };

        log::debug!(
            "Loaded configuration: solc {}, {} optimizer runs, default network {}",
            config.solidity.version,
            config.solidity.optimizer.runs,
            config.networks.default_network
        );

        Ok(config)
    }

    /// Signer index of a named account role
    pub fn named_account(&self, role: &str) -> Option<usize> {
        self.named_accounts.get(role).copied()
    }
}
