//! Error types for the Verlyx Hub runner

use thiserror::Error;
use verlyx_viewhost::ViewHostError;

/// Result type alias for runner operations
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Main error type for the runner
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("Window error: {0}")]
    Window(#[from] ViewHostError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RunnerError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new logging error
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_error_conversion() {
        let err: RunnerError = ViewHostError::WindowCreation("refused".into()).into();
        assert!(matches!(err, RunnerError::Window(_)));
        assert_eq!(err.to_string(), "Window error: Failed to create window: refused");
    }

    #[test]
    fn test_config_helper() {
        let err = RunnerError::config("width must be positive");
        assert_eq!(err.to_string(), "Configuration error: width must be positive");
    }
}
