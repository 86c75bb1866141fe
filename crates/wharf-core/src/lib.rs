//! # wharf-core
//!
//! Core abstractions for the wharf data-export platform.
//!
//! This crate provides the foundational types used across all wharf components:
//!
//! - **Identifiers**: Strongly-typed IDs for transfers, runs, and executions
//! - **Error Types**: Shared error definitions and result types
//! - **Connection Model**: The closed set of destination vendors and their
//!   connection-detail records, with credential redaction
//! - **Observability**: Logging initialization helpers
//!
//! ## Crate Boundary
//!
//! `wharf-core` is the **only** crate allowed to define shared primitives.
//! Domain logic (schedule computation, run reconciliation) lives in
//! `wharf-flow` and builds on the types defined here.
//!
//! ## Example
//!
//! ```rust
//! use wharf_core::prelude::*;
//!
//! // Generate a unique transfer-run ID
//! let run_id = TransferRunId::generate();
//! assert_ne!(run_id, TransferRunId::generate());
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod connection;
pub mod error;
pub mod id;
pub mod observability;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use wharf_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::connection::{ConnectionInfo, Secret};
    pub use crate::error::{Error, Result};
    pub use crate::id::{ExecutionId, TaskId, TransferId, TransferRunId};
    pub use crate::observability::{init_logging, LogFormat};
}

// Re-export key types at crate root for ergonomics
pub use connection::{ConnectionInfo, Secret};
pub use error::{Error, Result};
pub use id::{ExecutionId, TaskId, TransferId, TransferRunId};
pub use observability::{init_logging, LogFormat};
