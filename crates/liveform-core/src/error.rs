//! Error types for the form validation system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for form validation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the form validation system
#[derive(Error, Debug)]
pub enum Error {
    /// Input source-related errors
    #[error("Input source error: {0}")]
    Input(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Channel errors (closed receivers, dropped handles)
    #[error("Channel error: {0}")]
    Channel(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an input source error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a channel error
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
