//! Error types for sync operations

use thiserror::Error;

/// SaveSync error types
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing owner id or API endpoint. Fatal to any sync call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Game id not present in the config store.
    #[error("Game not found: {0}")]
    GameNotFound(String),

    /// The remote API answered with a non-success status.
    #[error("API error: {context} ({status})")]
    Api { context: String, status: u16 },
}

/// Result type for sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyncError::GameNotFound("elden-ring".to_string());
        assert_eq!(err.to_string(), "Game not found: elden-ring");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SyncError = io_err.into();
        assert!(matches!(err, SyncError::Io(_)));
    }

    #[test]
    fn test_error_configuration() {
        let err = SyncError::Configuration("ownerId is not set".to_string());
        assert!(err.to_string().contains("ownerId is not set"));
    }

    #[test]
    fn test_error_api_status() {
        let err = SyncError::Api {
            context: "upload-url".to_string(),
            status: 403,
        };
        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("upload-url"));
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }
}
