//! Generic tagged records, as exchanged with the event store.
//!
//! A record carries an author, a numeric kind, free-form content and an
//! ordered list of tags. Each tag is a list of strings whose first element
//! is the tag name.

use serde::{Deserialize, Serialize};

/// Kind of a profile (identity metadata) record.
pub const PROFILE_KIND: u32 = 0;

/// Kind of a replaceable application-data record, used for land claims.
pub const CLAIM_KIND: u32 = 30078;

/// A record in the polymorphic event store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedRecord {
    /// Record kind.
    pub kind: u32,
    /// Hex identity of the author. Signature checks happen upstream.
    #[serde(alias = "pubkey")]
    pub author: String,
    /// Unix seconds at which the record was created.
    #[serde(default)]
    pub created_at: u64,
    /// Free-form content.
    #[serde(default)]
    pub content: String,
    /// Ordered tags.
    #[serde(default)]
    pub tags: Vec<Vec<String>>,
}

impl TaggedRecord {
    /// Create an empty record.
    pub fn new(kind: u32, author: impl Into<String>, created_at: u64) -> Self {
        Self {
            kind,
            author: author.into(),
            created_at,
            content: String::new(),
            tags: Vec::new(),
        }
    }

    /// Builder-style content setter.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Append a `[name, value]` tag.
    pub fn push_tag(&mut self, name: &str, value: impl Into<String>) {
        self.tags.push(vec![name.to_string(), value.into()]);
    }

    /// Value of the first tag called `name`.
    ///
    /// Later duplicates are ignored; a tag with no value counts as absent.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.first().map(String::as_str) == Some(name))
            .and_then(|t| t.get(1))
            .map(String::as_str)
    }

    /// Whether the first tag called `name` carries `value`.
    pub fn has_tag(&self, name: &str, value: &str) -> bool {
        self.tag(name) == Some(value)
    }
}
