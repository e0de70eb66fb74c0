//! Task framework extensions
//!
//! [`Registry`] holds the handlers of every extension point; [`hooks`]
//! provides the built-in ones and [`hooks::install`] registers them.
//!
//! # Example
//!
//! ```rust
//! use contract_toolchain::compiler::{CompilerCache, SolcBuildRequest};
//! use contract_toolchain::config::{EnvVars, PipelineConfig};
//! use contract_toolchain::plugin::{hooks, Registry};
//!
//! let env = EnvVars::from_pairs([("SOLC_VERSION", "0.8.0"), ("SOLC_PATH", "/usr/bin/solc")]);
//! let config = PipelineConfig::from_env(&env).unwrap();
//!
//! let mut registry = Registry::new(CompilerCache::new(&config.compiler_cache_dir));
//! hooks::install(&mut registry, &config);
//!
//! let build = registry.get_solc_build(&SolcBuildRequest::new("0.8.0")).unwrap();
//! assert!(!build.is_solc_js);
//! ```

pub mod hooks;
pub mod registry;

pub use registry::{
    ExtensionPoint, Registry, ServerCreatedHandler, SolcBuildHandler, SolcBuildNext, TaskContext,
    TaskError, TaskHandler,
};
