use thiserror::Error;

/// Errors raised while reading the build configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required build variable '{key}'")]
    Missing { key: &'static str },

    #[error("Invalid value for build variable '{key}': {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_display() {
        let err = ConfigError::Missing {
            key: "REZ_BUILD_PATH",
        };
        assert_eq!(
            err.to_string(),
            "Missing required build variable 'REZ_BUILD_PATH'"
        );
    }
}
