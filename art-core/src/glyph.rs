//! Placed emoji glyphs - the building blocks of a document.

use crate::{GlyphId, Position};

/// An emoji (or any text) placed on the canvas.
///
/// Identity and text are fixed at creation. Position and size change through
/// the document's mutation methods only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiGlyph {
    id: GlyphId,
    text: String,
    position: Position,
    size: u32,
}

impl EmojiGlyph {
    /// Create a glyph. A zero size is raised to 1.
    #[must_use]
    pub(crate) fn new(id: GlyphId, text: impl Into<String>, position: Position, size: u32) -> Self {
        Self {
            id,
            text: text.into(),
            position,
            size: size.max(1),
        }
    }

    /// Unique identifier.
    #[must_use]
    pub const fn id(&self) -> GlyphId {
        self.id
    }

    /// Display text, usually a single emoji grapheme.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Canvas-space position of the glyph's center.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Point size, always greater than zero.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_size(&mut self, size: u32) {
        self.size = size.max(1);
    }
}

impl std::fmt::Display for EmojiGlyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} at {} size {}",
            self.id, self.text, self.position, self.size
        )
    }
}
