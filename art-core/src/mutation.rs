//! Pure document mutations.
//!
//! Each operation consumes a snapshot and returns the next one. Operations
//! addressed to an identity that is not on the canvas return the snapshot
//! unchanged: a glyph vanishing between gesture start and end is a routine
//! race, not an error.

use url::Url;

use crate::{Document, EmojiGlyph, GlyphId, Position};

impl Document {
    /// Append a glyph with a freshly allocated identity.
    ///
    /// The text is accepted as-is. A zero size is raised to 1. Once every
    /// identity has been handed out the document is returned unchanged with
    /// `None`.
    #[must_use]
    pub fn add_glyph(
        mut self,
        text: impl Into<String>,
        position: Position,
        size: u32,
    ) -> (Self, Option<GlyphId>) {
        let Some(id) = self.allocate_id() else {
            tracing::warn!("add_glyph: glyph identities exhausted, ignoring");
            return (self, None);
        };
        self.push_glyph(EmojiGlyph::new(id, text, position, size));
        (self, Some(id))
    }

    /// Translate a glyph by `delta`.
    #[must_use]
    pub fn move_glyph(mut self, id: GlyphId, delta: Position) -> Self {
        match self.glyph_mut(id) {
            Some(glyph) => {
                let position = glyph.position().offset_by(delta);
                glyph.set_position(position);
            }
            None => tracing::debug!("move_glyph: glyph {id} not found, ignoring"),
        }
        self
    }

    /// Multiply a glyph's size by `factor`, rounding half to even.
    ///
    /// Non-finite and non-positive factors leave the document unchanged.
    #[must_use]
    pub fn scale_glyph(mut self, id: GlyphId, factor: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            tracing::debug!("scale_glyph: ignoring factor {factor}");
            return self;
        }
        match self.glyph_mut(id) {
            Some(glyph) => {
                let size = scaled_size(glyph.size(), factor);
                glyph.set_size(size);
            }
            None => tracing::debug!("scale_glyph: glyph {id} not found, ignoring"),
        }
        self
    }

    /// Remove a glyph. Its identity is never handed out again.
    #[must_use]
    pub fn remove_glyph(mut self, id: GlyphId) -> Self {
        self.retain_glyphs(|glyph| glyph.id() != id);
        self
    }

    /// Replace the background reference, including clearing it.
    #[must_use]
    pub fn set_background(mut self, background: Option<Url>) -> Self {
        self.replace_background(background);
        self
    }
}

/// Scale a point size, rounding ties to even so repeated small gestures do not
/// drift in one direction. The result is clamped to `1..=u32::MAX`.
fn scaled_size(size: u32, factor: f64) -> u32 {
    let scaled = (f64::from(size) * factor).round_ties_even();
    if scaled < 1.0 {
        1
    } else if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            scaled as u32
        }
    }
}
