//! Positions on the Landmap plane.
//!
//! The plane is a fixed `MAP_WIDTH × MAP_HEIGHT` grid of integer cells.
//! Every identity owns exactly one cell, derived from its key; coordinates
//! are never stored apart from the identity that produced them.

use std::fmt;

use crate::error::Result;
use crate::identity::IdentityKey;

/// Width of the plane in world units.
pub const MAP_WIDTH: u32 = 100_000;

/// Height of the plane in world units.
pub const MAP_HEIGHT: u32 = 100_000;

/// A cell on the plane. `x < MAP_WIDTH`, `y < MAP_HEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapCoord {
    /// Horizontal position
    pub x: u32,
    /// Vertical position
    pub y: u32,
}

impl MapCoord {
    /// Top-left corner of the plane.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new coordinate.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Whether the coordinate lies on the plane.
    pub const fn in_bounds(&self) -> bool {
        self.x < MAP_WIDTH && self.y < MAP_HEIGHT
    }

    /// World-space position as floats, for the viewport.
    pub fn to_world(&self) -> (f64, f64) {
        (f64::from(self.x), f64::from(self.y))
    }
}

impl fmt::Display for MapCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", group_thousands(self.x), group_thousands(self.y))
    }
}

/// Render an integer with comma thousands separators: `12345` → `12,345`.
fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Map an identity, hex or `npub1...`, to its position.
///
/// Fails with `InvalidIdentity` unless the input decodes to exactly 32 bytes.
pub fn identity_to_coord(identity: &str) -> Result<MapCoord> {
    Ok(identity.parse::<IdentityKey>()?.coord())
}

/// Check that `(x, y)` is the position `identity` maps to.
///
/// A malformed identity never validates.
pub fn validate_coord(identity: &str, x: i64, y: i64) -> bool {
    match identity_to_coord(identity) {
        Ok(coord) => i64::from(coord.x) == x && i64::from(coord.y) == y,
        Err(_) => false,
    }
}
