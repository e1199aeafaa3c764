//! Land claim records.
//!
//! A claim is a replaceable record in which an identity asserts ownership of
//! the cell its key maps to, optionally with display attributes.
//!
//! # Wire Format
//!
//! ```text
//! ["d", "land-base"]          discriminator (required)
//! ["x", "<int>"]              must equal identity_to_coord(owner).x
//! ["y", "<int>"]              must equal identity_to_coord(owner).y
//! ["claimed_at", "<secs>"]    first-claim time, carried forward on update
//! ["t", "land"]               category marker for bulk discovery
//! ["title", ...] ["description", ...] ["color", ...]   optional
//! ```
//!
//! Decoding recomputes the owner's position; a record whose coordinates
//! disagree is rejected, never corrected.

use std::time::{SystemTime, UNIX_EPOCH};

use landmap_topology::{validate_coord, IdentityKey, MapCoord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::{TaggedRecord, CLAIM_KIND};

/// Value of the `d` tag identifying a land claim.
pub const CLAIM_DISCRIMINATOR: &str = "land-base";

/// Value of the `t` tag grouping land claims for discovery.
pub const CLAIM_CATEGORY: &str = "land";

/// Tag names.
pub mod tags {
    pub const DISCRIMINATOR: &str = "d";
    pub const X: &str = "x";
    pub const Y: &str = "y";
    pub const CLAIMED_AT: &str = "claimed_at";
    pub const CATEGORY: &str = "t";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const COLOR: &str = "color";
}

/// Optional display attributes supplied by the claimant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimAttributes {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Display color, e.g. `#rrggbb`. Not validated.
    pub color: Option<String>,
}

impl ClaimAttributes {
    /// Attributes with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

/// A decoded, validated land claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub owner: IdentityKey,
    pub coord: MapCoord,
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    /// Unix seconds of the first claim.
    pub claimed_at: Option<u64>,
}

impl ClaimRecord {
    /// Display attributes of this claim.
    pub fn attributes(&self) -> ClaimAttributes {
        ClaimAttributes {
            title: self.title.clone(),
            description: self.description.clone(),
            color: self.color.clone(),
        }
    }

    /// Encode a replacement for this claim, carrying `claimed_at` forward.
    pub fn update(&self, attrs: &ClaimAttributes, now: u64) -> TaggedRecord {
        encode(&self.owner, attrs, self.claimed_at, now)
    }
}

/// Why a tagged record was not accepted as a claim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordRejected {
    #[error("record kind {0} is not a land claim")]
    WrongKind(u32),

    #[error("discriminator tag is missing or not `land-base`")]
    WrongDiscriminator,

    #[error("author is not a valid identity: {0}")]
    InvalidOwner(String),

    #[error("required tag `{0}` is missing")]
    MissingTag(&'static str),

    #[error("tag `{0}` is not an integer")]
    NonNumericTag(&'static str),

    #[error("claimed position ({claimed_x}, {claimed_y}) does not match owner position {expected}")]
    CoordinateMismatch {
        expected: MapCoord,
        claimed_x: i64,
        claimed_y: i64,
    },
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Encode a claim for `owner`.
///
/// `previous_claimed_at` is the `claimed_at` of the claim being replaced;
/// pass `None` for a first claim and `now` is used instead. Absent or empty
/// attributes produce no tag. A zero `claimed_at` is omitted, since decoding
/// reads zero as absent.
pub fn encode(
    owner: &IdentityKey,
    attrs: &ClaimAttributes,
    previous_claimed_at: Option<u64>,
    now: u64,
) -> TaggedRecord {
    let coord = owner.coord();
    let claimed_at = previous_claimed_at.unwrap_or(now);

    let mut record = TaggedRecord::new(CLAIM_KIND, owner.to_hex(), now);
    record.push_tag(tags::DISCRIMINATOR, CLAIM_DISCRIMINATOR);
    record.push_tag(tags::X, coord.x.to_string());
    record.push_tag(tags::Y, coord.y.to_string());
    if claimed_at > 0 {
        record.push_tag(tags::CLAIMED_AT, claimed_at.to_string());
    }
    record.push_tag(tags::CATEGORY, CLAIM_CATEGORY);

    let optional = [
        (tags::TITLE, &attrs.title),
        (tags::DESCRIPTION, &attrs.description),
        (tags::COLOR, &attrs.color),
    ];
    for (name, value) in optional {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            record.push_tag(name, value);
        }
    }

    record
}

/// [`encode`] stamped with the system clock.
pub fn encode_now(
    owner: &IdentityKey,
    attrs: &ClaimAttributes,
    previous_claimed_at: Option<u64>,
) -> TaggedRecord {
    encode(owner, attrs, previous_claimed_at, unix_now())
}

/// Decode and validate a claim.
pub fn decode(record: &TaggedRecord) -> Result<ClaimRecord, RecordRejected> {
    if record.kind != CLAIM_KIND {
        return Err(RecordRejected::WrongKind(record.kind));
    }
    if !record.has_tag(tags::DISCRIMINATOR, CLAIM_DISCRIMINATOR) {
        return Err(RecordRejected::WrongDiscriminator);
    }

    let owner = IdentityKey::from_hex(&record.author)
        .map_err(|e| RecordRejected::InvalidOwner(e.to_string()))?;

    let x = integer_tag(record, tags::X)?;
    let y = integer_tag(record, tags::Y)?;
    if !validate_coord(&record.author, x, y) {
        return Err(RecordRejected::CoordinateMismatch {
            expected: owner.coord(),
            claimed_x: x,
            claimed_y: y,
        });
    }

    // Advisory: a malformed or zero timestamp is dropped, not fatal. `encode`
    // never writes zero, so this only affects foreign records.
    let claimed_at = record
        .tag(tags::CLAIMED_AT)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&t| t > 0);

    Ok(ClaimRecord {
        owner,
        coord: owner.coord(),
        title: text_tag(record, tags::TITLE),
        description: text_tag(record, tags::DESCRIPTION),
        color: text_tag(record, tags::COLOR),
        claimed_at,
    })
}

/// Decode a batch, dropping records that fail validation.
pub fn decode_all<'a, I>(records: I) -> Vec<ClaimRecord>
where
    I: IntoIterator<Item = &'a TaggedRecord>,
{
    records
        .into_iter()
        .filter_map(|record| match decode(record) {
            Ok(claim) => Some(claim),
            Err(reason) => {
                tracing::debug!(author = %record.author, %reason, "dropping claim record");
                None
            }
        })
        .collect()
}

fn integer_tag(record: &TaggedRecord, name: &'static str) -> Result<i64, RecordRejected> {
    record
        .tag(name)
        .ok_or(RecordRejected::MissingTag(name))?
        .trim()
        .parse::<i64>()
        .map_err(|_| RecordRejected::NonNumericTag(name))
}

fn text_tag(record: &TaggedRecord, name: &str) -> Option<String> {
    record
        .tag(name)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key(c: &str) -> IdentityKey {
        IdentityKey::from_hex(&c.repeat(64)).unwrap()
    }

    #[test]
    fn first_claim_then_update_keeps_claimed_at() {
        let owner = key("a");

        let first = encode(&owner, &ClaimAttributes::titled("Home"), None, 1_700_000_500);
        let claim = decode(&first).unwrap();
        assert_eq!(claim.owner, owner);
        assert_eq!(claim.coord, MapCoord::new(40_970, 40_970));
        assert_eq!(claim.title.as_deref(), Some("Home"));
        assert_eq!(claim.claimed_at, Some(1_700_000_500));

        let update = claim.update(&ClaimAttributes::titled("New Home"), 1_800_000_000);
        let updated = decode(&update).unwrap();
        assert_eq!(updated.title.as_deref(), Some("New Home"));
        assert_eq!(updated.claimed_at, Some(1_700_000_500));
        assert_eq!(update.created_at, 1_800_000_000);
    }

    #[test]
    fn previous_claimed_at_survives_wall_clock() {
        let record = encode_now(&key("b"), &ClaimAttributes::default(), Some(1_700_000_000));
        assert_eq!(decode(&record).unwrap().claimed_at, Some(1_700_000_000));
    }

    #[test]
    fn fresh_claim_uses_clock() {
        let before = unix_now();
        let record = encode_now(&key("c"), &ClaimAttributes::default(), None);
        let claimed_at = decode(&record).unwrap().claimed_at.unwrap();
        assert!(claimed_at >= before);
    }

    #[test]
    fn canonical_tag_order_and_no_empty_tags() {
        let attrs = ClaimAttributes {
            title: Some("Fort".into()),
            description: Some(String::new()),
            color: Some("#ff0000".into()),
        };
        let record = encode(&key("a"), &attrs, None, 42);
        let names: Vec<&str> = record.tags.iter().map(|t| t[0].as_str()).collect();
        assert_eq!(names, ["d", "x", "y", "claimed_at", "t", "title", "color"]);
        assert_eq!(record.kind, CLAIM_KIND);
        assert!(record.content.is_empty());
    }

    #[test]
    fn epoch_stamped_claim_omits_claimed_at() {
        let record = encode(&key("a"), &ClaimAttributes::default(), None, 0);
        assert!(record.tag(tags::CLAIMED_AT).is_none());
        let names: Vec<&str> = record.tags.iter().map(|t| t[0].as_str()).collect();
        assert_eq!(names, ["d", "x", "y", "t"]);

        let claim = decode(&record).unwrap();
        assert_eq!(claim.claimed_at, None);

        // A later update stamps a real time rather than carrying zero forward.
        let update = decode(&claim.update(&ClaimAttributes::default(), 1_700_000_000)).unwrap();
        assert_eq!(update.claimed_at, Some(1_700_000_000));
    }

    #[test]
    fn rejects_mismatched_coordinates() {
        let mut record = encode(&key("a"), &ClaimAttributes::default(), None, 1);
        record.tags[1] = vec!["x".into(), "1".into()];
        assert!(matches!(
            decode(&record),
            Err(RecordRejected::CoordinateMismatch { claimed_x: 1, .. })
        ));
    }

    #[test]
    fn rejects_forged_author() {
        let mut record = encode(&key("a"), &ClaimAttributes::default(), None, 1);
        record.author = "b".repeat(64);
        assert!(matches!(
            decode(&record),
            Err(RecordRejected::CoordinateMismatch { .. })
        ));
    }

    #[test]
    fn rejects_structural_problems() {
        let base = encode(&key("a"), &ClaimAttributes::default(), None, 1);

        let mut wrong_kind = base.clone();
        wrong_kind.kind = 1;
        assert_eq!(decode(&wrong_kind), Err(RecordRejected::WrongKind(1)));

        let mut wrong_d = base.clone();
        wrong_d.tags[0][1] = "something-else".into();
        assert_eq!(decode(&wrong_d), Err(RecordRejected::WrongDiscriminator));

        let mut no_y = base.clone();
        no_y.tags.retain(|t| t[0] != "y");
        assert_eq!(decode(&no_y), Err(RecordRejected::MissingTag("y")));

        let mut bad_x = base.clone();
        bad_x.tags[1][1] = "forty".into();
        assert_eq!(decode(&bad_x), Err(RecordRejected::NonNumericTag("x")));

        let mut bad_owner = base;
        bad_owner.author = "abc".into();
        assert!(matches!(decode(&bad_owner), Err(RecordRejected::InvalidOwner(_))));
    }

    #[test]
    fn bad_claimed_at_is_dropped_not_fatal() {
        let mut record = encode(&key("a"), &ClaimAttributes::titled("Home"), None, 1);
        record.tags[3][1] = "yesterday".into();
        let claim = decode(&record).unwrap();
        assert_eq!(claim.claimed_at, None);
        assert_eq!(claim.title.as_deref(), Some("Home"));
    }

    #[test]
    fn duplicate_tags_first_wins() {
        let mut record = encode(&key("a"), &ClaimAttributes::titled("First"), None, 1);
        record.push_tag(tags::TITLE, "Second");
        record.push_tag(tags::X, "0");
        let claim = decode(&record).unwrap();
        assert_eq!(claim.title.as_deref(), Some("First"));
    }

    #[test]
    fn decode_all_drops_rejected() {
        let good = encode(&key("a"), &ClaimAttributes::default(), None, 1);
        let mut bad = encode(&key("b"), &ClaimAttributes::default(), None, 1);
        bad.tags[2][1] = "0".into();
        let other = encode(&key("c"), &ClaimAttributes::default(), None, 1);

        let claims = decode_all(&[good, bad, other]);
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].owner, key("a"));
        assert_eq!(claims[1].owner, key("c"));
    }

    fn opt_text() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[a-zA-Z0-9 #]{1,24}")
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(
            bytes in proptest::array::uniform32(any::<u8>()),
            title in opt_text(),
            description in opt_text(),
            color in opt_text(),
            previous in proptest::option::of(0u64..=u32::MAX as u64),
            now in 0u64..=u32::MAX as u64,
        ) {
            let owner = IdentityKey::from_bytes(bytes);
            let attrs = ClaimAttributes { title, description, color };
            let claim = decode(&encode(&owner, &attrs, previous, now)).unwrap();
            prop_assert_eq!(claim.owner, owner);
            prop_assert_eq!(claim.coord, owner.coord());
            prop_assert_eq!(claim.attributes(), attrs);
            let expected = Some(previous.unwrap_or(now)).filter(|&t| t > 0);
            prop_assert_eq!(claim.claimed_at, expected);
        }
    }
}
