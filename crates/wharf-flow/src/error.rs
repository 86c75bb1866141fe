//! Error types for the schedule and run-history domain.

/// The result type used throughout wharf-flow.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in schedule and reconciliation operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A schedule could not be interpreted.
    ///
    /// Raised for unrecognized frequencies and for field values outside
    /// their documented ranges. The describer never raises this; its error
    /// channel is the sentinel display string.
    #[error("invalid schedule: {message}")]
    InvalidSchedule {
        /// Description of what made the schedule invalid.
        message: String,
    },

    /// An error from wharf-core.
    #[error("core error: {0}")]
    Core(#[from] wharf_core::error::Error),
}

impl Error {
    /// Creates a new invalid-schedule error.
    #[must_use]
    pub fn invalid_schedule(message: impl Into<String>) -> Self {
        Self::InvalidSchedule {
            message: message.into(),
        }
    }
}
