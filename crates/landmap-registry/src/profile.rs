//! Identity discovery feed.
//!
//! Identities are discovered through profile records whose content is a
//! loosely structured JSON attribute bag. A malformed bag degrades that entry
//! to having no metadata; the identity itself is kept.

use landmap_topology::IdentityKey;
use serde::{Deserialize, Serialize};

use crate::record::{TaggedRecord, PROFILE_KIND};

/// Display attributes an identity publishes about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileMetadata {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub picture: Option<String>,
    pub about: Option<String>,
    /// Verified name (`user@domain`).
    pub nip05: Option<String>,
}

impl ProfileMetadata {
    /// Parse a JSON attribute bag. Returns `None` on any parse failure.
    pub fn parse(content: &str) -> Option<Self> {
        serde_json::from_str(content).ok()
    }

    /// Preferred human-readable name: display name, else name.
    pub fn preferred_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.name.as_deref().filter(|s| !s.is_empty()))
    }
}

/// One discovered identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityEntry {
    pub identity: IdentityKey,
    #[serde(default)]
    pub metadata: Option<ProfileMetadata>,
}

impl IdentityEntry {
    /// An entry with no metadata.
    pub fn new(identity: IdentityKey) -> Self {
        Self {
            identity,
            metadata: None,
        }
    }

    /// Build an entry from a profile record.
    ///
    /// Returns `None` when the record is not a profile or its author is not
    /// a valid identity.
    pub fn from_profile_record(record: &TaggedRecord) -> Option<Self> {
        if record.kind != PROFILE_KIND {
            return None;
        }
        let identity = IdentityKey::from_hex(&record.author).ok()?;
        let metadata = ProfileMetadata::parse(&record.content);
        if metadata.is_none() && !record.content.trim().is_empty() {
            tracing::trace!(%identity, "profile metadata did not parse");
        }
        Some(Self { identity, metadata })
    }
}

/// Build the discovery list from a batch of profile records, in order.
pub fn entries_from_profiles<'a, I>(records: I) -> Vec<IdentityEntry>
where
    I: IntoIterator<Item = &'a TaggedRecord>,
{
    records
        .into_iter()
        .filter_map(|record| {
            let entry = IdentityEntry::from_profile_record(record);
            if entry.is_none() {
                tracing::debug!(author = %record.author, kind = record.kind, "skipping profile record");
            }
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(author: &str, content: &str) -> TaggedRecord {
        TaggedRecord::new(PROFILE_KIND, author, 0).with_content(content)
    }

    #[test]
    fn parses_known_fields_and_ignores_unknown() {
        let meta = ProfileMetadata::parse(
            r#"{"name":"alice","display_name":"Alice","nip05":"alice@example.com","lud16":"x"}"#,
        )
        .unwrap();
        assert_eq!(meta.name.as_deref(), Some("alice"));
        assert_eq!(meta.preferred_name(), Some("Alice"));
        assert_eq!(meta.nip05.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn preferred_name_falls_back() {
        let meta = ProfileMetadata {
            name: Some("bob".into()),
            display_name: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(meta.preferred_name(), Some("bob"));
        assert_eq!(ProfileMetadata::default().preferred_name(), None);
    }

    #[test]
    fn malformed_metadata_degrades() {
        let entry = IdentityEntry::from_profile_record(&profile(&"a".repeat(64), "{not json")).unwrap();
        assert_eq!(entry.metadata, None);

        let entry = IdentityEntry::from_profile_record(&profile(&"a".repeat(64), r#"{"name":5}"#)).unwrap();
        assert_eq!(entry.metadata, None);
    }

    #[test]
    fn bad_author_or_kind_is_skipped() {
        let records = vec![
            profile("nope", "{}"),
            profile(&"b".repeat(64), r#"{"name":"b"}"#),
            TaggedRecord::new(1, "c".repeat(64), 0),
        ];
        let entries = entries_from_profiles(&records);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].identity.to_hex(), "b".repeat(64));
        assert_eq!(
            entries[0].metadata.as_ref().and_then(|m| m.name.as_deref()),
            Some("b")
        );
    }
}
