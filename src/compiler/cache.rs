//! Default compiler acquisition
//!
//! Serves compiler builds from a local cache directory laid out as
//! `<dir>/<version>/solc` for native builds and `<dir>/<version>/soljson.js`
//! for the JavaScript build.

use semver::Version;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::resolver::SolcBuild;

/// File name of a cached native build
pub const NATIVE_BUILD_FILE: &str = "solc";
/// File name of a cached JavaScript build
pub const JS_BUILD_FILE: &str = "soljson.js";
/// File holding the full version string of a cached build
pub const LONG_VERSION_FILE: &str = "long_version";

/// Compiler acquisition errors
#[derive(Error, Debug)]
pub enum CompilerError {
    #[error("solc {version} is not cached in {dir:?}")]
    NotCached { version: String, dir: PathBuf },
    #[error("Invalid compiler version: {0:?}")]
    InvalidVersion(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Local compiler cache
#[derive(Debug, Clone)]
pub struct CompilerCache {
    dir: PathBuf,
}

impl CompilerCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn version_dir(&self, version: &str) -> Result<PathBuf, CompilerError> {
        let valid = !version.is_empty()
            && version
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'));
        if !valid {
            return Err(CompilerError::InvalidVersion(version.to_string()));
        }
        Ok(self.dir.join(version))
    }

    /// Look up the build of `version`, preferring the native binary
    pub fn get_solc_build(&self, version: &str) -> Result<SolcBuild, CompilerError> {
        let dir = self.version_dir(version)?;

        let (compiler_path, is_solc_js) = if dir.join(NATIVE_BUILD_FILE).is_file() {
            (dir.join(NATIVE_BUILD_FILE), false)
        } else if dir.join(JS_BUILD_FILE).is_file() {
            (dir.join(JS_BUILD_FILE), true)
        } else {
            return Err(CompilerError::NotCached {
                version: version.to_string(),
                dir: self.dir.clone(),
            });
        };

        let long_version_path = dir.join(LONG_VERSION_FILE);
        let long_version = if long_version_path.is_file() {
            std::fs::read_to_string(&long_version_path)?.trim().to_string()
        } else {
            version.to_string()
        };

        log::info!("Using cached solc {} from {:?}", version, compiler_path);

        Ok(SolcBuild {
            compiler_path,
            is_solc_js,
            version: version.to_string(),
            long_version,
        })
    }

    /// List cached versions, oldest first. Directories that are not semantic
    /// versions sort last, by name.
    pub fn versions(&self) -> Result<Vec<String>, CompilerError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut versions = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                versions.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        versions.sort_by_cached_key(|v| Version::parse(v).map_err(|_| v.clone()));
        Ok(versions)
    }
}
