use dunc_ast::ExtractError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting or running a routine
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Failed to initialize Python interpreter: {0}")]
    Initialization(String),

    #[error("Python error: {0}")]
    Python(String),

    #[error("Project file '{}' is not valid Python: {message}", path.display())]
    Syntax { path: PathBuf, message: String },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// A `dunc.DuncError` escaped from a routine
    #[error("{0}")]
    Dunc(String),

    /// Any other exception raised by a routine, with its full traceback
    #[error("The {routine} function failed:\n{traceback}")]
    RoutineFailed { routine: String, traceback: String },
}

/// Generic conversion from PyErr to BridgeError.
///
/// NOTE: This conversion loses the Python traceback information! Failures
/// raised by descriptor routines go through `routine::routine_error`, which
/// keeps it.
impl From<pyo3::PyErr> for BridgeError {
    fn from(err: pyo3::PyErr) -> Self {
        BridgeError::Python(format!("{}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routine_failed_display_keeps_traceback() {
        let err = BridgeError::RoutineFailed {
            routine: "install".to_string(),
            traceback: "Traceback (most recent call last):\nNameError: name 'x' is not defined\n"
                .to_string(),
        };
        let message = err.to_string();
        assert!(message.starts_with("The install function failed:"));
        assert!(message.contains("NameError: name 'x' is not defined"));
    }
}
