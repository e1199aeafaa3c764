//! Event store backed by JSON files.
//!
//! Each file holds a JSON array of tagged records, as exported from a relay.
//! A missing path yields no records.

use std::path::{Path, PathBuf};

use landmap_registry::{Error, EventStore, Result, TaggedRecord, CLAIM_KIND, PROFILE_KIND};

#[derive(Debug, Clone, Default)]
pub struct FileStore {
    profiles: Option<PathBuf>,
    claims: Option<PathBuf>,
}

impl FileStore {
    pub fn new(profiles: Option<PathBuf>, claims: Option<PathBuf>) -> Self {
        Self { profiles, claims }
    }

    async fn load(path: Option<&Path>, kind: u32, limit: usize) -> Result<Vec<TaggedRecord>> {
        let Some(path) = path else {
            return Ok(Vec::new());
        };
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Store(format!("{}: {e}", path.display())))?;
        let records = read_records(&content)?;

        let total = records.len();
        let records: Vec<_> = records
            .into_iter()
            .filter(|r| r.kind == kind)
            .take(limit)
            .collect();
        tracing::debug!(
            path = %path.display(),
            kind,
            total,
            kept = records.len(),
            "loaded records"
        );
        Ok(records)
    }
}

impl EventStore for FileStore {
    async fn profiles(&self, limit: usize) -> Result<Vec<TaggedRecord>> {
        Self::load(self.profiles.as_deref(), PROFILE_KIND, limit).await
    }

    async fn claims(&self, limit: usize) -> Result<Vec<TaggedRecord>> {
        Self::load(self.claims.as_deref(), CLAIM_KIND, limit).await
    }
}

/// Parse a JSON array of records.
pub fn read_records(content: &str) -> Result<Vec<TaggedRecord>> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use landmap_registry::{encode, ClaimAttributes, IdentityKey};

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("landmap-{}-{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn reads_and_filters_by_kind() {
        let owner = IdentityKey::from_hex(&"a".repeat(64)).unwrap();
        let claim = encode(&owner, &ClaimAttributes::titled("Home"), None, 10);
        let profile = TaggedRecord::new(PROFILE_KIND, owner.to_hex(), 5).with_content("{}");
        let json = serde_json::to_string(&vec![claim.clone(), profile.clone()]).unwrap();
        let path = write_temp("mixed.json", &json);

        let store = FileStore::new(Some(path.clone()), Some(path.clone()));
        assert_eq!(store.claims(10).await.unwrap(), vec![claim]);
        assert_eq!(store.profiles(10).await.unwrap(), vec![profile]);
        assert!(store.profiles(0).await.unwrap().is_empty());

        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn missing_path_is_empty() {
        let store = FileStore::default();
        assert!(store.claims(500).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreadable_file_is_a_store_error() {
        let path = std::env::temp_dir().join("landmap-no-such-records.json");
        let store = FileStore::new(Some(path), None);
        assert!(matches!(store.profiles(1).await, Err(Error::Store(_))));
    }

    #[test]
    fn accepts_pubkey_field_name() {
        let records = read_records(
            r#"[{"kind":0,"pubkey":"abc","created_at":1,"content":"{}","tags":[]}]"#,
        )
        .unwrap();
        assert_eq!(records[0].author, "abc");
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        assert!(matches!(read_records("{"), Err(Error::Serialization(_))));
    }
}
