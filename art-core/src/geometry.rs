//! Canvas-space value types and glyph identities.

use serde::{Deserialize, Serialize};

/// A point in canvas space (not screen space).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Position {
    /// The canvas origin.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a position from its coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by `delta`, saturating at the `i32` bounds.
    #[must_use]
    pub const fn offset_by(self, delta: Self) -> Self {
        Self {
            x: self.x.saturating_add(delta.x),
            y: self.y.saturating_add(delta.y),
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Identity of a placed glyph.
///
/// Identities are allocated by the owning [`Document`](crate::Document),
/// increase monotonically and are never reused, even after the glyph that
/// held one is removed. [`GlyphId::EXHAUSTED`] is never handed out; an
/// allocator that reaches it has no identities left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlyphId(u64);

impl GlyphId {
    /// The first identity handed out by an empty document.
    pub const FIRST: Self = Self(1);

    /// Allocator value once every identity has been handed out.
    pub const EXHAUSTED: Self = Self(u64::MAX);

    /// Wrap a raw identity value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identity value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identity allocated after this one. Saturates at
    /// [`GlyphId::EXHAUSTED`].
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for GlyphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for GlyphId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_by_adds_components() {
        let moved = Position::new(3, 4).offset_by(Position::new(10, -5));
        assert_eq!(moved, Position::new(13, -1));
    }

    #[test]
    fn test_offset_by_saturates() {
        let moved = Position::new(i32::MAX, i32::MIN).offset_by(Position::new(1, -1));
        assert_eq!(moved, Position::new(i32::MAX, i32::MIN));
    }

    #[test]
    fn test_glyph_id_ordering_and_next() {
        assert_eq!(GlyphId::FIRST.get(), 1);
        assert_eq!(GlyphId::FIRST.next(), GlyphId::new(2));
        assert_eq!(GlyphId::EXHAUSTED.next(), GlyphId::EXHAUSTED);
        assert!(GlyphId::new(2) > GlyphId::FIRST);
    }

    #[test]
    fn test_glyph_id_parse() {
        let id: GlyphId = "42".parse().expect("parse");
        assert_eq!(id, GlyphId::new(42));
        assert!("nope".parse::<GlyphId>().is_err());
    }
}
