//! Identity keys.
//!
//! An identity is a 32-byte public key, exchanged as 64 hex characters.
//! Parsing accepts either case; the canonical form is lowercase.
//!
//! Keys may also be written as bech32 `npub1...` strings. [`FromStr`]
//! accepts both forms.

use std::fmt;
use std::str::FromStr;

use bech32::{Bech32, Hrp};

use crate::coord::{MapCoord, MAP_HEIGHT, MAP_WIDTH};
use crate::error::{Result, TopologyError};

/// Length of an identity key in bytes.
pub const IDENTITY_LEN: usize = 32;

/// Human-readable prefix of bech32-encoded public keys.
pub const NPUB_HRP: &str = "npub";

/// A 32-byte public identity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey([u8; IDENTITY_LEN]);

impl IdentityKey {
    /// Create a key from raw bytes.
    pub const fn from_bytes(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }

    /// Convert to lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex (64 characters, any case).
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != IDENTITY_LEN * 2 {
            return Err(TopologyError::InvalidIdentity(format!(
                "expected {} hex characters, got {}",
                IDENTITY_LEN * 2,
                s.len()
            )));
        }
        let bytes = hex::decode(s).map_err(|e| TopologyError::InvalidIdentity(e.to_string()))?;
        let mut arr = [0u8; IDENTITY_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Parse a bech32 `npub1...` string.
    pub fn from_npub(s: &str) -> Result<Self> {
        let (hrp, data) =
            bech32::decode(s).map_err(|e| TopologyError::InvalidIdentity(e.to_string()))?;
        if !hrp.to_string().eq_ignore_ascii_case(NPUB_HRP) {
            return Err(TopologyError::InvalidIdentity(format!(
                "expected prefix {NPUB_HRP}, got {hrp}"
            )));
        }
        let arr: [u8; IDENTITY_LEN] = data.as_slice().try_into().map_err(|_| {
            TopologyError::InvalidIdentity(format!(
                "expected {IDENTITY_LEN} bytes, got {}",
                data.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Encode as a bech32 `npub1...` string.
    pub fn to_npub(&self) -> Result<String> {
        let hrp = Hrp::parse(NPUB_HRP).map_err(|e| TopologyError::Encoding(e.to_string()))?;
        bech32::encode::<Bech32>(hrp, &self.0).map_err(|e| TopologyError::Encoding(e.to_string()))
    }

    /// Short form used for labels: first 8 hex characters and an ellipsis.
    pub fn short(&self) -> String {
        format!("{}...", &self.to_hex()[..8])
    }

    /// The deterministic position of this identity on the plane.
    ///
    /// The first 16 bytes (the first 32 hex characters) are read as a
    /// big-endian `u128` for x, the last 16 bytes for y.
    pub fn coord(&self) -> MapCoord {
        let (hi, lo) = self.0.split_at(IDENTITY_LEN / 2);
        let mut first = [0u8; 16];
        let mut second = [0u8; 16];
        first.copy_from_slice(hi);
        second.copy_from_slice(lo);

        let x = u128::from_be_bytes(first) % u128::from(MAP_WIDTH);
        let y = u128::from_be_bytes(second) % u128::from(MAP_HEIGHT);

        // Both remainders are below 100_000, so the narrowing is lossless.
        MapCoord::new(x as u32, y as u32)
    }
}

impl FromStr for IdentityKey {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self> {
        let prefix = s.get(..NPUB_HRP.len() + 1);
        if prefix.is_some_and(|p| p.eq_ignore_ascii_case("npub1")) {
            Self::from_npub(s)
        } else {
            Self::from_hex(s)
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for IdentityKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for IdentityKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NPUB: &str = "npub10elfcs4fr0l0r8af98jlmgdh9c8tcxjvz9qkw038js35mp4dma8qzvjptg";
    const NPUB_HEX: &str = "7e7e9c42a91bfef19fa929e5fda1b72e0ebc1a4c1141673e2794234d86addf4e";

    #[test]
    fn hex_roundtrip_is_lowercase() {
        let upper = "AB".repeat(32);
        let key = IdentityKey::from_hex(&upper).unwrap();
        assert_eq!(key.to_hex(), "ab".repeat(32));
        assert_eq!(key, IdentityKey::from_hex(&"ab".repeat(32)).unwrap());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(IdentityKey::from_hex("abcd").is_err());
        assert!(IdentityKey::from_hex(&"a".repeat(63)).is_err());
        assert!(IdentityKey::from_hex(&"a".repeat(66)).is_err());
        assert!(IdentityKey::from_hex("").is_err());
    }

    #[test]
    fn rejects_non_hex() {
        let bad = format!("{}zz", "a".repeat(62));
        assert!(matches!(
            IdentityKey::from_hex(&bad),
            Err(TopologyError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn short_form() {
        let key = IdentityKey::from_hex(&"0123456789abcdef".repeat(4)).unwrap();
        assert_eq!(key.short(), "01234567...");
    }

    #[test]
    fn halves_map_independently() {
        let mut bytes = [0u8; 32];
        bytes[15] = 7;
        bytes[31] = 9;
        let coord = IdentityKey::from_bytes(bytes).coord();
        assert_eq!(coord, MapCoord::new(7, 9));
    }

    #[test]
    fn npub_decodes_to_known_key() {
        let key = IdentityKey::from_npub(NPUB).unwrap();
        assert_eq!(key.to_hex(), NPUB_HEX);
        assert_eq!(key.to_npub().unwrap(), NPUB);
    }

    #[test]
    fn from_str_accepts_both_forms() {
        let from_npub: IdentityKey = NPUB.parse().unwrap();
        let from_upper: IdentityKey = NPUB.to_uppercase().parse().unwrap();
        let from_hex: IdentityKey = NPUB_HEX.parse().unwrap();
        assert_eq!(from_npub, from_hex);
        assert_eq!(from_upper, from_hex);
    }

    #[test]
    fn npub_rejects_other_prefixes() {
        let bytes = IdentityKey::from_hex(NPUB_HEX).unwrap();
        let nsec = bech32::encode::<Bech32>(Hrp::parse("nsec").unwrap(), bytes.as_bytes()).unwrap();
        assert!(matches!(
            IdentityKey::from_npub(&nsec),
            Err(TopologyError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn npub_rejects_wrong_payload_length() {
        let short = bech32::encode::<Bech32>(Hrp::parse(NPUB_HRP).unwrap(), &[7u8; 20]).unwrap();
        assert!(matches!(
            IdentityKey::from_npub(&short),
            Err(TopologyError::InvalidIdentity(_))
        ));
        assert!(short.parse::<IdentityKey>().is_err());
    }

    #[test]
    fn npub_rejects_bad_checksum() {
        let mut corrupt = NPUB.to_string();
        corrupt.pop();
        corrupt.push('q');
        assert!(IdentityKey::from_npub(&corrupt).is_err());
    }

    proptest! {
        #[test]
        fn npub_roundtrip(bytes in proptest::array::uniform32(any::<u8>())) {
            let key = IdentityKey::from_bytes(bytes);
            let npub = key.to_npub().unwrap();
            prop_assert!(npub.starts_with("npub1"));
            prop_assert_eq!(IdentityKey::from_npub(&npub).unwrap(), key);
        }
    }
}
