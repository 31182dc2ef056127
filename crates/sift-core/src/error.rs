//! Error types for Sift

use thiserror::Error;

/// Result type alias for Sift operations
pub type SiftResult<T> = Result<T, SiftError>;

/// Main error type for Sift
#[derive(Error, Debug, Clone)]
pub enum SiftError {
    /// Invalid configuration, detected before any work starts
    #[error("Configuration error: {0}")]
    Config(String),

    /// The analyzer rejected a file
    #[error("Analyze error: {path}: {message}")]
    Analyze { path: String, message: String },

    /// A single analyze call exceeded its time budget
    #[error("Analyze call timed out after {millis} ms")]
    Timeout { millis: u64 },

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// The run was cancelled
    #[error("Run was cancelled")]
    Cancelled,

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

impl SiftError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new analyze error for a file
    pub fn analyze(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Analyze {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub const fn timeout(millis: u64) -> Self {
        Self::Timeout { millis }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// True for errors that abort a run before it starts
    pub fn is_setup_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<anyhow::Error> for SiftError {
    fn from(error: anyhow::Error) -> Self {
        Self::Other(error.to_string())
    }
}

impl From<std::io::Error> for SiftError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for SiftError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SiftError::analyze("src/lib.rs", "rate limit");
        assert_eq!(err.to_string(), "Analyze error: src/lib.rs: rate limit");

        let err = SiftError::timeout(250);
        assert_eq!(err.to_string(), "Analyze call timed out after 250 ms");
    }

    #[test]
    fn test_setup_error_classification() {
        assert!(SiftError::config("concurrent_limit must be >= 1").is_setup_error());
        assert!(!SiftError::analyze("a.rs", "boom").is_setup_error());
        assert!(!SiftError::Cancelled.is_setup_error());
    }

    #[test]
    fn test_conversions() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(SiftError::from(io), SiftError::Io(_)));

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(SiftError::from(json), SiftError::Json(_)));

        let any = anyhow::anyhow!("wrapped");
        assert!(matches!(SiftError::from(any), SiftError::Other(_)));
    }
}
