//! Build environment configuration for dunc
//!
//! rez exports the state of a package build through `REZ_BUILD_*` variables.
//! This crate reads them exactly once into a [`BuildConfig`] snapshot that the
//! rest of the workspace receives by reference. Nothing outside this crate
//! looks at the process environment.
//!
//! Path and string options are only required when something asks for them:
//! a build that never installs does not need `REZ_BUILD_INSTALL_PATH`.

mod build_env;
mod errors;

pub use build_env::{keys, BuildConfig, BuildType, ConfigSource, EnvSource};
pub use errors::ConfigError;
