//! Error types for landmap-registry.

use thiserror::Error;

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in registry operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Identity parsing or placement failed
    #[error("Topology error: {0}")]
    Topology(#[from] landmap_topology::TopologyError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The external event store failed
    #[error("Store error: {0}")]
    Store(String),
}
