//! Result type alias for proxylint operations

use crate::error::ProxyLintError;

/// Standard Result type for proxylint operations
pub type Result<T> = std::result::Result<T, ProxyLintError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Log the error and continue with None
    fn log_and_continue(self) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn log_and_continue(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                if err.is_recoverable() {
                    tracing::debug!("Continuing after error: {}", err);
                } else {
                    tracing::error!("Unexpected error: {}", err);
                }
                None
            }
        }
    }
}
