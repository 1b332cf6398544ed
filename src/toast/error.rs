//! Toast Host Error Types
//!
//! The queue's commands are total; the only failures are contract
//! violations detected when a host is constructed.

use thiserror::Error;

/// Result type for toast host construction
pub type ToastResult<T> = Result<T, ToastError>;

/// Errors that can occur while setting up a toast host
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToastError {
    /// No tokio runtime is reachable from the calling context
    #[error("No tokio runtime available - toast timers need a runtime handle")]
    NoRuntime,

    /// Host configuration failed validation
    #[error("Invalid toast host configuration: {message}")]
    InvalidConfig { message: String },
}

impl ToastError {
    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
