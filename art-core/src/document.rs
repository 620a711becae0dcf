//! The canonical document snapshot.

use url::Url;

use crate::{EmojiGlyph, GlyphId};

/// A complete canvas snapshot: optional background reference plus glyphs.
///
/// Glyphs are kept in insertion order, which is also their z-order. The
/// document owns its identity allocator so that every mutation is a pure
/// snapshot-to-snapshot function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    background: Option<Url>,
    glyphs: Vec<EmojiGlyph>,
    next_glyph_id: GlyphId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with no background.
    #[must_use]
    pub fn new() -> Self {
        Self {
            background: None,
            glyphs: Vec::new(),
            next_glyph_id: GlyphId::FIRST,
        }
    }

    /// Rebuild a document from persisted parts.
    ///
    /// The allocator is raised past every existing identity so identities are
    /// never handed out twice, even if `next_glyph_id` was stale.
    pub(crate) fn from_parts(
        background: Option<Url>,
        glyphs: Vec<EmojiGlyph>,
        next_glyph_id: GlyphId,
    ) -> Self {
        let floor = glyphs
            .iter()
            .map(|glyph| glyph.id().next())
            .max()
            .unwrap_or(GlyphId::FIRST);
        Self {
            background,
            glyphs,
            next_glyph_id: next_glyph_id.max(floor),
        }
    }

    /// The background image reference, if any.
    #[must_use]
    pub fn background(&self) -> Option<&Url> {
        self.background.as_ref()
    }

    /// All glyphs in z-order.
    #[must_use]
    pub fn glyphs(&self) -> &[EmojiGlyph] {
        &self.glyphs
    }

    /// Look up a glyph by identity.
    #[must_use]
    pub fn glyph(&self, id: GlyphId) -> Option<&EmojiGlyph> {
        self.glyphs.iter().find(|glyph| glyph.id() == id)
    }

    /// Number of glyphs on the canvas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the canvas has no glyphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// The identity the next added glyph will receive.
    #[must_use]
    pub const fn next_glyph_id(&self) -> GlyphId {
        self.next_glyph_id
    }

    pub(crate) fn glyph_mut(&mut self, id: GlyphId) -> Option<&mut EmojiGlyph> {
        self.glyphs.iter_mut().find(|glyph| glyph.id() == id)
    }

    pub(crate) fn push_glyph(&mut self, glyph: EmojiGlyph) {
        self.glyphs.push(glyph);
    }

    /// Hand out the next identity, or `None` once the allocator is exhausted.
    pub(crate) fn allocate_id(&mut self) -> Option<GlyphId> {
        let id = self.next_glyph_id;
        if id == GlyphId::EXHAUSTED {
            return None;
        }
        self.next_glyph_id = id.next();
        Some(id)
    }

    pub(crate) fn retain_glyphs(&mut self, keep: impl FnMut(&EmojiGlyph) -> bool) {
        self.glyphs.retain(keep);
    }

    pub(crate) fn replace_background(&mut self, background: Option<Url>) {
        self.background = background;
    }
}
