//! Marker snapshot publication.
//!
//! Refreshes fetch identities and claims from an external store and run
//! concurrently with rendering. Readers only ever see a complete snapshot.
//! Each refresh holds a ticket; when a newer refresh has started, an older
//! one's result is discarded instead of merged (last write wins).

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use landmap_topology::IdentityKey;
use serde::Serialize;
use tokio::sync::watch;

use crate::claim::{decode_all, ClaimRecord};
use crate::error::Result;
use crate::markers::{merge, with_current_identity, Marker, MarkerStats};
use crate::profile::{entries_from_profiles, IdentityEntry};
use crate::record::TaggedRecord;

/// Source of profile and claim records.
///
/// Implementations query the event store; signature checks and returning at
/// most the latest record per owner are the store's responsibility.
pub trait EventStore {
    /// Up to `limit` profile records.
    fn profiles(&self, limit: usize) -> impl Future<Output = Result<Vec<TaggedRecord>>> + Send;

    /// Up to `limit` claim records carrying the claim discriminator and
    /// category tags.
    fn claims(&self, limit: usize) -> impl Future<Output = Result<Vec<TaggedRecord>>> + Send;
}

/// Immutable marker set for one render.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MarkerSnapshot {
    /// Ticket of the refresh that produced this snapshot (0 = initial).
    pub generation: u64,
    pub markers: Vec<Marker>,
    pub stats: MarkerStats,
}

impl MarkerSnapshot {
    /// Build a snapshot from already parsed inputs.
    pub fn build(generation: u64, identities: &[IdentityEntry], claims: &[ClaimRecord]) -> Self {
        let markers = merge(identities, claims);
        let stats = MarkerStats::from_markers(&markers);
        Self {
            generation,
            markers,
            stats,
        }
    }
}

/// Handle identifying one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Publishes marker snapshots to any number of readers.
pub struct SnapshotFeed {
    latest_ticket: AtomicU64,
    tx: watch::Sender<Arc<MarkerSnapshot>>,
}

impl Default for SnapshotFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotFeed {
    /// Create a feed holding an empty snapshot.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(MarkerSnapshot::default()));
        Self {
            latest_ticket: AtomicU64::new(0),
            tx,
        }
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<MarkerSnapshot>> {
        self.tx.subscribe()
    }

    /// The snapshot currently published.
    pub fn current(&self) -> Arc<MarkerSnapshot> {
        self.tx.borrow().clone()
    }

    /// Start a refresh. Any refresh started earlier becomes stale.
    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket(self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Publish the result of a refresh.
    ///
    /// Returns `false` and discards the snapshot when a newer refresh has
    /// been started since `ticket` was issued.
    pub fn publish(
        &self,
        ticket: RefreshTicket,
        identities: &[IdentityEntry],
        claims: &[ClaimRecord],
    ) -> bool {
        if ticket.0 != self.latest_ticket.load(Ordering::SeqCst) {
            tracing::debug!(ticket = ticket.0, "discarding superseded marker refresh");
            return false;
        }

        let snapshot = MarkerSnapshot::build(ticket.0, identities, claims);
        let stats = snapshot.stats;
        let published = self.tx.send_if_modified(|current| {
            if ticket.0 > current.generation {
                *current = Arc::new(snapshot);
                true
            } else {
                false
            }
        });

        if published {
            tracing::info!(
                generation = ticket.0,
                markers = stats.total,
                claimed = stats.claimed,
                "published marker snapshot"
            );
        }
        published
    }

    /// Fetch from `store`, rebuild markers and publish.
    ///
    /// `current` is the signed-in identity, added to the discovery list when
    /// the store did not return it. Returns whether the result was published.
    pub async fn refresh<S: EventStore>(
        &self,
        store: &S,
        limit: usize,
        current: Option<&IdentityKey>,
    ) -> Result<bool> {
        let ticket = self.begin_refresh();

        let profiles = store.profiles(limit).await?;
        let claim_records = store.claims(limit).await?;

        let identities = with_current_identity(entries_from_profiles(&profiles), current);
        let claims = decode_all(&claim_records);

        Ok(self.publish(ticket, &identities, &claims))
    }
}
