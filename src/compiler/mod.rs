//! Compiler toolchain selection
//!
//! # Overview
//!
//! A compile run asks for one compiler build per distinct solc version.
//! [`resolve`] answers with the pre-installed native binary when the
//! version matches [`NativeCompiler::expected_version`], and otherwise hands
//! the request to a fallback, which in the default chain is the local
//! [`CompilerCache`].
//!
//! # Example
//!
//! ```rust
//! use contract_toolchain::compiler::{resolve, CompilerCache, NativeCompiler, SolcBuildRequest};
//!
//! let native = NativeCompiler::new("0.8.0", "/usr/bin/solc");
//! let cache = CompilerCache::new(".toolchain/compilers");
//!
//! let request = SolcBuildRequest::new("0.8.0");
//! let resolved = resolve(&request, &native, || cache.get_solc_build(&request.version)).unwrap();
//!
//! assert!(resolved.is_native());
//! assert_eq!(resolved.build().long_version, "0.8.0-dummy-long-version");
//! ```

pub mod cache;
pub mod resolver;

pub use cache::{CompilerCache, CompilerError};
pub use resolver::{
    long_version, resolve, CompilerDescriptor, NativeCompiler, SolcBuild, SolcBuildRequest,
};
