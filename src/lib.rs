//! Contract toolchain: compiler selection and lifecycle hooks for a
//! smart-contract build/test/deploy pipeline
//!
//! This crate provides:
//! - Native compiler selection with fallback to a local compiler cache
//! - Per-network deployment profiles loaded from the environment
//! - An extension point registry for the task framework
//! - Account listing and server keep-alive hooks
//! - A local development server exposing the resolved configuration
//!
//! # Example
//!
//! ```rust
//! use contract_toolchain::compiler::{resolve, NativeCompiler, SolcBuild, SolcBuildRequest};
//!
//! let native = NativeCompiler::new("0.8.0", "/usr/bin/solc");
//! let request = SolcBuildRequest::new("0.8.0");
//!
//! let resolved = resolve(&request, &native, || -> Result<SolcBuild, String> {
//!     unreachable!("matching versions never fall back")
//! })
//! .unwrap();
//!
//! let build = resolved.into_build();
//! assert_eq!(build.compiler_path.to_str(), Some("/usr/bin/solc"));
//! assert!(!build.is_solc_js);
//! ```

pub mod accounts;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod crypto;
pub mod plugin;
pub mod server;

// Re-export commonly used types
pub use accounts::{list_accounts, MnemonicSigners, Signer, SignerProvider};
pub use compiler::{
    resolve, CompilerCache, CompilerDescriptor, NativeCompiler, SolcBuild, SolcBuildRequest,
};
pub use config::{EnvVars, NetworkProfile, Networks, PipelineConfig};
pub use crypto::KeyPair;
pub use plugin::{ExtensionPoint, Registry, TaskContext};
pub use server::{DevServer, ServerHandle};
