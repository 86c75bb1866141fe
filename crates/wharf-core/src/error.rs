//! Error types and result aliases for wharf.
//!
//! This module defines the shared error types used across all wharf components.
//! Errors are structured for programmatic handling and include context for debugging.

/// The result type used throughout wharf.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wharf-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An invalid identifier was provided.
    #[error("invalid identifier: {message}")]
    InvalidId {
        /// Description of what made the ID invalid.
        message: String,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Creates a new invalid-input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_display() {
        let err = Error::InvalidId {
            message: "not a UUID".into(),
        };
        assert!(err.to_string().contains("invalid identifier"));
        assert!(err.to_string().contains("not a UUID"));
    }

    #[test]
    fn invalid_input_display() {
        let err = Error::invalid_input("port out of range");
        assert_eq!(err.to_string(), "invalid input: port out of range");
    }
}
