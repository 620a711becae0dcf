//! Error types for document persistence.

use thiserror::Error;

use crate::GlyphId;

/// Errors raised while decoding a persisted document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The bytes are not a valid JSON document of the expected shape.
    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document was written by an incompatible schema version.
    #[error("Unsupported schema version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },

    /// The background reference is not a valid URL.
    #[error("Invalid background URL {url:?}: {reason}")]
    InvalidBackground {
        /// The raw value that failed to parse.
        url: String,
        /// Parser error message.
        reason: String,
    },

    /// Two glyphs share the same identity.
    #[error("Duplicate glyph identity: {0}")]
    DuplicateGlyph(GlyphId),

    /// A glyph carries the identity reserved for an exhausted allocator.
    #[error("Glyph identity {0} is reserved")]
    ReservedIdentity(GlyphId),

    /// A glyph has a zero point size.
    #[error("Glyph {0} has zero size")]
    ZeroSize(GlyphId),
}

/// Errors raised by byte stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The store refused the write.
    #[error("Write rejected: {0}")]
    Rejected(String),
}
