//! Native compiler selection
//!
//! Decides whether a requested compiler version is served by a
//! pre-installed native binary or by the next resolver in the chain.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::env::{EnvVars, SOLC_PATH, SOLC_VERSION};

/// Program name used when no native binary path is configured
pub const DEFAULT_SOLC_PROGRAM: &str = "solc";

/// Suffix of the synthesized long version of a native build
pub const LONG_VERSION_SUFFIX: &str = "-dummy-long-version";

/// A compiler build as consumed by the compile task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolcBuild {
    pub compiler_path: PathBuf,
    /// `true` for the JavaScript/wasm build, `false` for a native binary
    pub is_solc_js: bool,
    pub version: String,
    /// Only recorded in build-info files
    pub long_version: String,
}

impl SolcBuild {
    /// Describe a native binary serving `version`
    pub fn native(compiler_path: PathBuf, version: &str) -> Self {
        Self {
            compiler_path,
            is_solc_js: false,
            version: version.to_string(),
            long_version: long_version(version),
        }
    }
}

/// Derive the informational long version of a native build
pub fn long_version(version: &str) -> String {
    format!("{}{}", version, LONG_VERSION_SUFFIX)
}

/// A request for the compiler build of one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolcBuildRequest {
    pub version: String,
}

impl SolcBuildRequest {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
        }
    }
}

/// How a request was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilerDescriptor {
    /// Built here from the native compiler settings
    Native(SolcBuild),
    /// Returned untouched by the fallback
    Delegated(SolcBuild),
}

impl CompilerDescriptor {
    pub fn build(&self) -> &SolcBuild {
        match self {
            Self::Native(build) | Self::Delegated(build) => build,
        }
    }

    pub fn into_build(self) -> SolcBuild {
        match self {
            Self::Native(build) | Self::Delegated(build) => build,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }
}

/// Settings of the pre-installed native compiler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NativeCompiler {
    /// The only version the native binary serves
    pub expected_version: Option<String>,
    pub binary_path: Option<PathBuf>,
}

impl NativeCompiler {
    pub fn new(expected_version: &str, binary_path: impl Into<PathBuf>) -> Self {
        Self {
            expected_version: Some(expected_version.to_string()),
            binary_path: Some(binary_path.into()),
        }
    }

    /// Read `SOLC_VERSION` and `SOLC_PATH`
    pub fn from_env(env: &EnvVars) -> Self {
        Self {
            expected_version: env.get_string(SOLC_VERSION),
            binary_path: env.get(SOLC_PATH).map(PathBuf::from),
        }
    }

    /// Whether the native binary serves `version`. Without an expected
    /// version nothing matches.
    pub fn matches(&self, version: &str) -> bool {
        self.expected_version.as_deref() == Some(version)
    }

    fn compiler_path(&self) -> PathBuf {
        self.binary_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOLC_PROGRAM))
    }
}

/// Resolve a compiler build.
///
/// A request whose version equals the configured expected version yields a
/// [`CompilerDescriptor::Native`] without touching the filesystem; a
/// missing or broken binary only surfaces when the compiler is invoked.
/// Any other request logs a warning and calls `fallback` exactly once,
/// returning its build unchanged and propagating its error unchanged.
pub fn resolve<F, E>(
    request: &SolcBuildRequest,
    native: &NativeCompiler,
    fallback: F,
) -> Result<CompilerDescriptor, E>
where
    F: FnOnce() -> Result<SolcBuild, E>,
{
    if native.matches(&request.version) {
        log::debug!(
            "Using native compiler {:?} for solc {}",
            native.compiler_path(),
            request.version
        );
        return Ok(CompilerDescriptor::Native(SolcBuild::native(
            native.compiler_path(),
            &request.version,
        )));
    }

    log::warn!(
        "Using compiler downloaded by the build framework for solc {}",
        request.version
    );
    fallback().map(CompilerDescriptor::Delegated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn cached_build(version: &str) -> SolcBuild {
        SolcBuild {
            compiler_path: PathBuf::from(format!("/cache/{}/soljson.js", version)),
            is_solc_js: true,
            version: version.to_string(),
            long_version: format!("{}+commit.c7dfd78e", version),
        }
    }

    #[test]
    fn test_matching_version_uses_native_binary() {
        let native = NativeCompiler::new("0.8.0", "/usr/bin/solc");
        let calls = Cell::new(0);

        let resolved = resolve(&SolcBuildRequest::new("0.8.0"), &native, || {
            calls.set(calls.get() + 1);
            Ok::<_, String>(cached_build("0.8.0"))
        })
        .unwrap();

        assert_eq!(calls.get(), 0);
        assert!(resolved.is_native());
        assert_eq!(
            resolved.into_build(),
            SolcBuild {
                compiler_path: PathBuf::from("/usr/bin/solc"),
                is_solc_js: false,
                version: "0.8.0".to_string(),
                long_version: "0.8.0-dummy-long-version".to_string(),
            }
        );
    }

    #[test]
    fn test_mismatch_delegates_once() {
        let native = NativeCompiler::new("0.8.0", "/usr/bin/solc");
        let request = SolcBuildRequest::new("0.8.19");
        let calls = Cell::new(0);

        let resolved = resolve(&request, &native, || {
            calls.set(calls.get() + 1);
            Ok::<_, String>(cached_build("0.8.19"))
        })
        .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(resolved, CompilerDescriptor::Delegated(cached_build("0.8.19")));
        assert_eq!(request, SolcBuildRequest::new("0.8.19"));
    }

    #[test]
    fn test_unset_expected_version_never_matches() {
        let native = NativeCompiler {
            expected_version: None,
            binary_path: Some(PathBuf::from("/usr/bin/solc")),
        };
        let calls = Cell::new(0);

        let resolved = resolve(&SolcBuildRequest::new("0.8.19"), &native, || {
            calls.set(calls.get() + 1);
            Ok::<_, String>(cached_build("0.8.19"))
        })
        .unwrap();

        assert_eq!(calls.get(), 1);
        assert!(!resolved.is_native());
        assert!(!NativeCompiler::default().matches(""));
    }

    #[test]
    fn test_fallback_error_propagates_unchanged() {
        let native = NativeCompiler::default();
        let err = resolve(&SolcBuildRequest::new("0.7.6"), &native, || {
            Err::<SolcBuild, _>("network unreachable".to_string())
        })
        .unwrap_err();

        assert_eq!(err, "network unreachable");
    }

    #[test]
    fn test_long_version_is_deterministic() {
        let native = NativeCompiler::new("0.8.4", "/opt/solc");
        let first = resolve(&SolcBuildRequest::new("0.8.4"), &native, || {
            Err::<SolcBuild, ()>(())
        })
        .unwrap();
        let second = resolve(&SolcBuildRequest::new("0.8.4"), &native, || {
            Err::<SolcBuild, ()>(())
        })
        .unwrap();

        assert_eq!(first.build().long_version, second.build().long_version);
        assert_ne!(first.build().long_version, first.build().version);
        assert!(!first.build().long_version.is_empty());
    }

    #[test]
    fn test_missing_path_defers_to_program_name() {
        let native = NativeCompiler {
            expected_version: Some("0.8.0".to_string()),
            binary_path: None,
        };
        let resolved = resolve(&SolcBuildRequest::new("0.8.0"), &native, || {
            Err::<SolcBuild, ()>(())
        })
        .unwrap();

        assert_eq!(resolved.build().compiler_path, PathBuf::from("solc"));
    }

    #[test]
    fn test_native_build_json_shape() {
        let build = SolcBuild::native(PathBuf::from("/usr/bin/solc"), "0.8.0");
        let json = serde_json::to_value(&build).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "compilerPath": "/usr/bin/solc",
                "isSolcJs": false,
                "version": "0.8.0",
                "longVersion": "0.8.0-dummy-long-version",
            })
        );
    }
}
