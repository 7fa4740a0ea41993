//! In-process stores for the storefront.
//!
//! There is no database behind this service: orders are keyed by an opaque
//! random id and live in an in-memory map, which also naturally partitions
//! concurrent users. The store layer still looks like a repository so a
//! durable backend could slot in behind the same surface.

pub mod orders;

use thiserror::Error;

pub use orders::{CallbackDisposition, OrderStore};

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The write conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),
}
