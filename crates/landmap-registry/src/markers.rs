//! Marker index: one render-ready marker per discovered identity.

use std::collections::{HashMap, HashSet};

use landmap_topology::{IdentityKey, MapCoord};
use serde::Serialize;

use crate::claim::ClaimRecord;
use crate::profile::{IdentityEntry, ProfileMetadata};

/// A discovered identity, claimed or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Marker {
    Unclaimed {
        identity: IdentityKey,
        coord: MapCoord,
        metadata: Option<ProfileMetadata>,
    },
    Claimed {
        record: ClaimRecord,
        metadata: Option<ProfileMetadata>,
    },
}

impl Marker {
    /// Unclaimed marker for an identity.
    pub fn unclaimed(identity: IdentityKey, metadata: Option<ProfileMetadata>) -> Self {
        Marker::Unclaimed {
            identity,
            coord: identity.coord(),
            metadata,
        }
    }

    pub fn identity(&self) -> &IdentityKey {
        match self {
            Marker::Unclaimed { identity, .. } => identity,
            Marker::Claimed { record, .. } => &record.owner,
        }
    }

    pub fn coord(&self) -> MapCoord {
        match self {
            Marker::Unclaimed { coord, .. } => *coord,
            Marker::Claimed { record, .. } => record.coord,
        }
    }

    pub fn has_claimed(&self) -> bool {
        matches!(self, Marker::Claimed { .. })
    }

    pub fn metadata(&self) -> Option<&ProfileMetadata> {
        match self {
            Marker::Unclaimed { metadata, .. } | Marker::Claimed { metadata, .. } => metadata.as_ref(),
        }
    }

    pub fn record(&self) -> Option<&ClaimRecord> {
        match self {
            Marker::Claimed { record, .. } => Some(record),
            Marker::Unclaimed { .. } => None,
        }
    }

    /// Declared color of a claimed marker.
    pub fn color(&self) -> Option<&str> {
        self.record()
            .and_then(|r| r.color.as_deref())
            .filter(|c| !c.is_empty())
    }

    /// Label text: claim title, else profile name, else truncated key.
    pub fn label(&self) -> String {
        if let Some(title) = self.record().and_then(|r| r.title.as_deref()).filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        if let Some(name) = self.metadata().and_then(ProfileMetadata::preferred_name) {
            return name.to_string();
        }
        self.identity().short()
    }
}

/// Merge the discovery list with decoded claims.
///
/// Output follows the order of `identities`. An identity with a claim gets
/// the claimed shape plus its discovery metadata. Repeated identities keep
/// their first position only. Claims whose owner was never discovered are
/// not surfaced.
pub fn merge(identities: &[IdentityEntry], claims: &[ClaimRecord]) -> Vec<Marker> {
    let by_owner: HashMap<&IdentityKey, &ClaimRecord> =
        claims.iter().map(|claim| (&claim.owner, claim)).collect();

    let mut seen = HashSet::with_capacity(identities.len());
    let mut markers = Vec::with_capacity(identities.len());

    for entry in identities {
        if !seen.insert(entry.identity) {
            continue;
        }
        let marker = match by_owner.get(&entry.identity) {
            Some(&claim) => Marker::Claimed {
                record: claim.clone(),
                metadata: entry.metadata.clone(),
            },
            None => Marker::unclaimed(entry.identity, entry.metadata.clone()),
        };
        markers.push(marker);
    }

    let dropped = by_owner.keys().filter(|owner| !seen.contains(**owner)).count();
    if dropped > 0 {
        tracing::debug!(dropped, "claims without a discovered identity were not surfaced");
    }

    markers
}

/// Ensure the signed-in identity is part of the discovery list.
///
/// When `current` is missing from `identities` it is prepended with no
/// metadata, so the current user always has a marker to center on.
pub fn with_current_identity(
    mut identities: Vec<IdentityEntry>,
    current: Option<&IdentityKey>,
) -> Vec<IdentityEntry> {
    if let Some(current) = current {
        if !identities.iter().any(|e| &e.identity == current) {
            identities.insert(0, IdentityEntry::new(*current));
        }
    }
    identities
}

/// Summary counts for a marker set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MarkerStats {
    pub total: usize,
    pub claimed: usize,
}

impl MarkerStats {
    pub fn from_markers(markers: &[Marker]) -> Self {
        Self {
            total: markers.len(),
            claimed: markers.iter().filter(|m| m.has_claimed()).count(),
        }
    }

    /// Percentage of identities that have claimed, 0 for an empty set.
    pub fn claim_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.claimed as f64 / self.total as f64 * 100.0
    }
}
