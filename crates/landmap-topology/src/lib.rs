//! Landmap Topology
//!
//! Deterministic placement of network identities on a bounded 2D plane.
//!
//! # Placement
//!
//! Every identity is a 32-byte public key. Its 64 hex characters are split
//! into two halves, each read as a 128-bit unsigned integer:
//!
//! ```text
//! x = u128(key[0..16])  mod MAP_WIDTH
//! y = u128(key[16..32]) mod MAP_HEIGHT
//! ```
//!
//! The mapping is pure. Anyone holding a key can recompute its position, so
//! a published position can always be checked against its owner.

mod coord;
mod error;
mod identity;

pub use coord::{identity_to_coord, validate_coord, MapCoord, MAP_HEIGHT, MAP_WIDTH};
pub use error::{Result, TopologyError};
pub use identity::{IdentityKey, IDENTITY_LEN, NPUB_HRP};
