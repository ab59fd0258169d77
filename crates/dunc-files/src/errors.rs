use dunc_config::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving or installing files
#[derive(Error, Debug)]
pub enum FilesError {
    #[error("Root directory '{}' does not exist.", .0.display())]
    RootNotFound(PathBuf),

    #[error("path must be relative, not absolute: '{}'", .0.display())]
    AbsolutePath(PathBuf),

    #[error("path must stay inside its root: '{}'", .0.display())]
    EscapesRoot(PathBuf),

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to {action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FilesError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        FilesError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
