//! Landmap Registry
//!
//! Claim records, identity discovery and the marker set the viewport draws.
//!
//! # Design
//!
//! Records arrive from an external event store as generic tagged records.
//! Claims are decoded and checked against the owner's derived position;
//! profiles supply optional display metadata. The two are merged into one
//! marker per identity and published as an immutable snapshot.
//!
//! # Trust
//!
//! Authorship is established by the store's signature checks. This crate
//! only checks that a claim's coordinates are the ones its owner's key maps
//! to, so no one can claim a position they did not earn.

pub mod claim;
mod error;
pub mod feed;
pub mod markers;
pub mod profile;
pub mod record;

pub use claim::{
    decode, decode_all, encode, encode_now, unix_now, ClaimAttributes, ClaimRecord, RecordRejected,
    CLAIM_CATEGORY, CLAIM_DISCRIMINATOR,
};
pub use error::{Error, Result};
pub use feed::{EventStore, MarkerSnapshot, RefreshTicket, SnapshotFeed};
pub use markers::{merge, with_current_identity, Marker, MarkerStats};
pub use profile::{entries_from_profiles, IdentityEntry, ProfileMetadata};
pub use record::{TaggedRecord, CLAIM_KIND, PROFILE_KIND};

pub use landmap_topology::{IdentityKey, MapCoord};
