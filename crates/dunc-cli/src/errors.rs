//! Errors surfaced by the `dunc` binary

use dunc_ast::ExtractError;
use dunc_config::ConfigError;
use dunc_python::BridgeError;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can end a dunc run
#[derive(Error, Debug)]
pub enum DuncError {
    #[error("This script should only be run in a build environment.")]
    Environment,

    #[error("Project file '{}' does not exist.", .0.display())]
    MissingProjectFile(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl DuncError {
    /// Whether this is one of dunc's own failures, reported as a single line
    ///
    /// Exceptions raised by a build routine itself, and interpreter failures,
    /// are not: those are shown with their full traceback.
    pub fn is_domain(&self) -> bool {
        !matches!(
            self,
            DuncError::Bridge(
                BridgeError::RoutineFailed { .. }
                    | BridgeError::Initialization(_)
                    | BridgeError::Python(_)
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            DuncError::Environment.to_string(),
            "This script should only be run in a build environment."
        );
        assert_eq!(
            DuncError::MissingProjectFile(PathBuf::from("/src/package.py")).to_string(),
            "Project file '/src/package.py' does not exist."
        );
        assert_eq!(
            DuncError::from(ExtractError::NotFound("install".to_string())).to_string(),
            "No install function found in the project file."
        );
    }

    #[test]
    fn test_domain_errors() {
        assert!(DuncError::Environment.is_domain());
        assert!(DuncError::from(ConfigError::Missing { key: "REZ_BUILD_PATH" }).is_domain());
        assert!(DuncError::from(BridgeError::Dunc("Root directory 'x' does not exist.".into()))
            .is_domain());
        assert!(!DuncError::from(BridgeError::RoutineFailed {
            routine: "build".to_string(),
            traceback: "Traceback".to_string(),
        })
        .is_domain());
    }
}
