/// Structured error types for gesn-core.
///
/// Library crates return these; the `gesn` binary wraps them in `anyhow`
/// with extra context.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gesn-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Reading or writing a config file failed
    #[error("I/O error on {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    /// Config file is not valid TOML for [`crate::GesnConfig`]
    #[error("Failed to parse config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config could not be rendered back to TOML
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config parsed but holds unusable values
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Discriminator string is not a known product type
    #[error("Unknown product type '{0}'")]
    UnknownProductType(String),

    /// Stored status string is not a known order status
    #[error("Unknown order status '{0}'")]
    UnknownOrderStatus(String),
}

/// Result type alias for gesn-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_config("seed.admin.user_name is empty");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: seed.admin.user_name is empty"
        );

        let err = CoreError::UnknownProductType("Bundle".into());
        assert_eq!(err.to_string(), "Unknown product type 'Bundle'");
    }

    #[test]
    fn test_io_error_carries_path() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = CoreError::io("/tmp/gesn.toml", io_err);

        assert!(matches!(err, CoreError::Io { .. }));
        assert!(err.to_string().contains("/tmp/gesn.toml"));
    }
}
