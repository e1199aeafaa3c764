//! Error types for landmap-topology.

use thiserror::Error;

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Errors that can occur while deriving positions from identities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// The identity key is not 64 hex characters (32 bytes).
    #[error("invalid identity key: {0}")]
    InvalidIdentity(String),

    /// A key could not be written in bech32 form.
    #[error("identity encoding failed: {0}")]
    Encoding(String),
}
