//! Error types for the swipe-lock control
//!
//! The gesture core is total over its inputs and never fails. Errors only
//! come from the edges: loading configuration and reading scenario files.

use thiserror::Error;

/// Swipe-lock errors
#[derive(Error, Debug, Clone)]
pub enum SwipeLockError {
    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File system I/O error
    #[error("IO error: {0}")]
    IOError(String),

    /// Scenario file could not be parsed or is malformed
    #[error("Scenario error: {0}")]
    ScenarioError(String),
}

impl From<std::io::Error> for SwipeLockError {
    fn from(e: std::io::Error) -> Self {
        SwipeLockError::IOError(e.to_string())
    }
}

impl From<toml::de::Error> for SwipeLockError {
    fn from(e: toml::de::Error) -> Self {
        SwipeLockError::ConfigError(e.to_string())
    }
}

impl SwipeLockError {
    /// Check if this error is recoverable
    ///
    /// A recoverable error lets the control keep running with its defaults.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Falling back to the default configuration is always possible
            SwipeLockError::ConfigError(_) => true,
            SwipeLockError::IOError(_) => false,
            SwipeLockError::ScenarioError(_) => false,
        }
    }

    /// Get a user-friendly description of the error
    pub fn user_message(&self) -> String {
        match self {
            SwipeLockError::ConfigError(_) => {
                "Configuration error. Falling back to default settings.".to_string()
            }
            SwipeLockError::IOError(_) => "File system error occurred.".to_string(),
            SwipeLockError::ScenarioError(_) => {
                "Scenario file is invalid. Please check its contents.".to_string()
            }
        }
    }
}

/// Result type alias for swipe-lock operations
pub type Result<T> = std::result::Result<T, SwipeLockError>;
