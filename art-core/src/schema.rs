//! Versioned, lossless byte encoding of a [`Document`].
//!
//! The persisted form is UTF-8 JSON. Glyphs are stored as flat records in
//! z-order so a decoded document compares equal to the one that was encoded.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Document, EmojiGlyph, GlyphId, Position, SchemaError};

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Persisted glyph description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphRecord {
    /// Glyph identity.
    pub id: GlyphId,
    /// Display text.
    pub text: String,
    /// Horizontal canvas coordinate.
    pub x: i32,
    /// Vertical canvas coordinate.
    pub y: i32,
    /// Point size.
    pub size: u32,
}

impl From<&EmojiGlyph> for GlyphRecord {
    fn from(glyph: &EmojiGlyph) -> Self {
        let Position { x, y } = glyph.position();
        Self {
            id: glyph.id(),
            text: glyph.text().to_string(),
            x,
            y,
            size: glyph.size(),
        }
    }
}

impl GlyphRecord {
    /// Convert the record to a runtime glyph.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ZeroSize`] if the record has a zero size.
    pub fn into_glyph(self) -> Result<EmojiGlyph, SchemaError> {
        if self.size == 0 {
            return Err(SchemaError::ZeroSize(self.id));
        }
        Ok(EmojiGlyph::new(
            self.id,
            self.text,
            Position::new(self.x, self.y),
            self.size,
        ))
    }
}

/// Canonical persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFile {
    /// Schema version.
    pub version: u32,
    /// Background reference as a URL string.
    #[serde(default)]
    pub background_url: Option<String>,
    /// Next identity the allocator will hand out.
    #[serde(default = "DocumentFile::default_next_glyph_id")]
    pub next_glyph_id: GlyphId,
    /// Glyphs in z-order.
    #[serde(default)]
    pub glyphs: Vec<GlyphRecord>,
}

impl DocumentFile {
    const fn default_next_glyph_id() -> GlyphId {
        GlyphId::FIRST
    }

    /// Build the persisted form of a document.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        Self {
            version: SCHEMA_VERSION,
            background_url: document.background().map(Url::to_string),
            next_glyph_id: document.next_glyph_id(),
            glyphs: document.glyphs().iter().map(GlyphRecord::from).collect(),
        }
    }

    /// Materialize the runtime document.
    ///
    /// # Errors
    ///
    /// Returns an error if the version is unsupported, the background URL does
    /// not parse, a glyph has zero size or the reserved identity, or two glyphs
    /// share an identity.
    pub fn into_document(self) -> Result<Document, SchemaError> {
        if self.version != SCHEMA_VERSION {
            return Err(SchemaError::UnsupportedVersion {
                found: self.version,
                expected: SCHEMA_VERSION,
            });
        }

        let background = self
            .background_url
            .map(|raw| {
                Url::parse(&raw).map_err(|e| SchemaError::InvalidBackground {
                    url: raw.clone(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        let mut seen = HashSet::with_capacity(self.glyphs.len());
        let mut glyphs = Vec::with_capacity(self.glyphs.len());
        for record in self.glyphs {
            if record.id == GlyphId::EXHAUSTED {
                return Err(SchemaError::ReservedIdentity(record.id));
            }
            if !seen.insert(record.id) {
                return Err(SchemaError::DuplicateGlyph(record.id));
            }
            glyphs.push(record.into_glyph()?);
        }

        Ok(Document::from_parts(background, glyphs, self.next_glyph_id))
    }
}

/// Encode a document to bytes.
///
/// # Errors
///
/// Returns [`SchemaError::Malformed`] if serialization fails.
pub fn encode(document: &Document) -> Result<Vec<u8>, SchemaError> {
    Ok(serde_json::to_vec(&DocumentFile::from_document(document))?)
}

/// Decode a document from bytes.
///
/// # Errors
///
/// Returns a [`SchemaError`] describing why the bytes are not a valid document.
pub fn decode(bytes: &[u8]) -> Result<Document, SchemaError> {
    let file: DocumentFile = serde_json::from_slice(bytes)?;
    file.into_document()
}
