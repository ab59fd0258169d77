//! Snapshot of the rez build environment
//!
//! Values are captured once by [`BuildConfig::from_source`]. Accessors for
//! required options return [`ConfigError::Missing`] when the variable was not
//! set, so the failure surfaces at the point of use with the variable name.

use crate::errors::ConfigError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Variable names recognized by dunc
pub mod keys {
    /// Set (to anything non-empty) whenever rez runs a build command
    pub const BUILD_ENV: &str = "REZ_BUILD_ENV";
    /// "1" when the build was invoked with `--install`
    pub const BUILD_INSTALL: &str = "REZ_BUILD_INSTALL";
    pub const BUILD_PATH: &str = "REZ_BUILD_PATH";
    pub const INSTALL_PATH: &str = "REZ_BUILD_INSTALL_PATH";
    pub const SOURCE_PATH: &str = "REZ_BUILD_SOURCE_PATH";
    pub const PROJECT_FILE: &str = "REZ_BUILD_PROJECT_FILE";
    pub const PROJECT_NAME: &str = "REZ_BUILD_PROJECT_NAME";
    pub const PROJECT_VERSION: &str = "REZ_BUILD_PROJECT_VERSION";
    /// "central" for releases, "local" for `rez build --install`
    pub const BUILD_TYPE: &str = "REZ_BUILD_TYPE";
    /// Advisory: the build directory should be wiped before building
    pub const CLOBBER: &str = "DUNK_CLOBBER";
}

/// Where configuration values come from
pub trait ConfigSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Kind of build rez is running
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildType {
    Central,
    Local,
    Other(String),
}

impl BuildType {
    fn parse(value: &str) -> Self {
        match value {
            "central" => BuildType::Central,
            "local" => BuildType::Local,
            other => BuildType::Other(other.to_string()),
        }
    }
}

/// Read-only view of the build phase
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    build_env: bool,
    install: bool,
    clobber: bool,
    build_path: Option<String>,
    install_path: Option<String>,
    source_path: Option<String>,
    project_file: Option<String>,
    project_name: Option<String>,
    project_version: Option<String>,
    build_type: Option<String>,
}

impl BuildConfig {
    /// Capture the current process environment
    pub fn from_env() -> Self {
        Self::from_source(&EnvSource)
    }

    pub fn from_source(source: &impl ConfigSource) -> Self {
        let config = BuildConfig {
            build_env: source
                .var(keys::BUILD_ENV)
                .is_some_and(|value| !value.is_empty()),
            install: source.var(keys::BUILD_INSTALL).as_deref() == Some("1"),
            clobber: source.var(keys::CLOBBER).as_deref() == Some("1"),
            build_path: source.var(keys::BUILD_PATH),
            install_path: source.var(keys::INSTALL_PATH),
            source_path: source.var(keys::SOURCE_PATH),
            project_file: source.var(keys::PROJECT_FILE),
            project_name: source.var(keys::PROJECT_NAME),
            project_version: source.var(keys::PROJECT_VERSION),
            build_type: source.var(keys::BUILD_TYPE),
        };
        debug!("Captured build configuration: {:?}", config);
        config
    }

    /// True when running under a rez build command
    pub fn is_build(&self) -> bool {
        self.build_env
    }

    /// True when the build should also install
    pub fn is_install(&self) -> bool {
        self.install
    }

    pub fn clobber(&self) -> bool {
        self.clobber
    }

    pub fn build_path(&self) -> Result<&Path, ConfigError> {
        required_path(keys::BUILD_PATH, self.build_path.as_deref())
    }

    pub fn install_path(&self) -> Result<&Path, ConfigError> {
        required_path(keys::INSTALL_PATH, self.install_path.as_deref())
    }

    pub fn source_path(&self) -> Result<&Path, ConfigError> {
        required_path(keys::SOURCE_PATH, self.source_path.as_deref())
    }

    pub fn project_file(&self) -> Result<&Path, ConfigError> {
        required_path(keys::PROJECT_FILE, self.project_file.as_deref())
    }

    pub fn project_name(&self) -> Result<&str, ConfigError> {
        required(keys::PROJECT_NAME, self.project_name.as_deref())
    }

    pub fn project_version(&self) -> Result<&str, ConfigError> {
        required(keys::PROJECT_VERSION, self.project_version.as_deref())
    }

    pub fn build_type(&self) -> Result<BuildType, ConfigError> {
        required(keys::BUILD_TYPE, self.build_type.as_deref()).map(BuildType::parse)
    }

    pub fn is_release(&self) -> Result<bool, ConfigError> {
        Ok(self.build_type()? == BuildType::Central)
    }

    pub fn is_local(&self) -> Result<bool, ConfigError> {
        Ok(self.build_type()? == BuildType::Local)
    }

    /// Anchor `path` under the source root unless it is already absolute
    pub fn anchor_to_source(&self, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
        anchor(self.source_path()?, path)
    }

    /// Anchor `path` under the install root unless it is already absolute
    pub fn anchor_to_install(&self, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
        anchor(self.install_path()?, path)
    }
}

fn required<'a>(key: &'static str, value: Option<&'a str>) -> Result<&'a str, ConfigError> {
    value.ok_or(ConfigError::Missing { key })
}

fn required_path<'a>(key: &'static str, value: Option<&'a str>) -> Result<&'a Path, ConfigError> {
    let value = required(key, value)?;
    if value.is_empty() {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        });
    }
    Ok(Path::new(value))
}

fn anchor(base: &Path, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    Ok(match path {
        None => base.to_path_buf(),
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => base.join(p),
    })
}
