use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating a routine in a descriptor
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read project file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Project file '{}' is not valid Python (line {line})", path.display())]
    Parse { path: PathBuf, line: usize },

    #[error("No {0} function found in the project file.")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ExtractError::NotFound("install".to_string());
        assert_eq!(err.to_string(), "No install function found in the project file.");
    }
}
