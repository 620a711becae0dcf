//! # Emoji Art Core
//!
//! The document model behind the Emoji Art editor: a canvas made of one
//! optional background reference and an ordered set of placed emoji glyphs.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  art-core                   │
//! ├─────────────────────────────────────────────┤
//! │  Geometry        │  Document                │
//! │  - Position      │  - Background reference  │
//! │  - GlyphId       │  - Glyphs in z-order     │
//! │                  │  - Identity allocator    │
//! ├─────────────────────────────────────────────┤
//! │  Mutations       │  Persistence             │
//! │  - add/move      │  - Versioned schema      │
//! │  - scale/remove  │  - Byte stores           │
//! │  - background    │                          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Everything here is synchronous and free of I/O except the file-backed
//! [`FileStore`]. Fetching the background image lives in `art-document`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod background;
pub mod document;
pub mod error;
pub mod geometry;
pub mod glyph;
pub mod mutation;
pub mod palette;
pub mod schema;
pub mod store;

pub use background::normalize_image_url;
pub use document::Document;
pub use error::{SchemaError, StoreError};
pub use geometry::{GlyphId, Position};
pub use glyph::EmojiGlyph;
pub use palette::{Palette, PaletteSet, DEFAULT_GLYPH_SIZE};
pub use schema::{decode, encode, DocumentFile, GlyphRecord, SCHEMA_VERSION};
pub use store::{ByteStore, FileStore, MemoryStore, DOCUMENT_KEY};

/// Core crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
