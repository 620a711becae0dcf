//! # Emoji Art CLI
//!
//! Command-line editor for the autosaved Emoji Art document.
//!
//! ## Usage
//!
//! ```bash
//! emoji-art add ⭐ --x 10 --y -5
//! emoji-art scale 1 2.0
//! emoji-art background https://example.com/sky.png
//! emoji-art show
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `EditorConfig` - Data directory, transport and wait settings
//! - `Editor` - Opens the document in the data directory and runs one command

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod editor;

pub use editor::Editor;

use std::path::PathBuf;
use std::time::Duration;

use art_core::{GlyphId, DEFAULT_GLYPH_SIZE};
use art_document::FetchConfig;
use clap::{Parser, Subcommand};
use url::Url;

/// Default directory holding the autosaved document.
pub const DEFAULT_DATA_DIR: &str = ".emoji-art";

/// Default bound on waiting for a background fetch, in seconds.
pub const DEFAULT_SETTLE_TIMEOUT_SECS: u64 = 30;

/// Command-line arguments for emoji-art.
#[derive(Debug, Clone, Parser)]
#[command(name = "emoji-art")]
#[command(about = "Edit an autosaved emoji art document")]
#[command(version)]
pub struct CliArgs {
    /// Directory the document is saved in
    #[arg(long, global = true, env = "EMOJI_ART_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// HTTP timeout for background retrieval, in seconds
    #[arg(long, global = true, env = "EMOJI_ART_FETCH_TIMEOUT_SECS")]
    pub fetch_timeout: Option<u64>,

    /// How long `background` waits for the image, in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_SETTLE_TIMEOUT_SECS)]
    pub settle_timeout: u64,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Editor commands.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Print the document
    Show,
    /// Place an emoji on the canvas
    Add {
        /// Emoji to place
        text: String,
        /// Horizontal position
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        x: i32,
        /// Vertical position
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        y: i32,
        /// Point size
        #[arg(long, default_value_t = DEFAULT_GLYPH_SIZE)]
        size: u32,
    },
    /// Move an emoji by an offset
    Move {
        /// Glyph id
        id: GlyphId,
        /// Horizontal offset
        #[arg(allow_negative_numbers = true)]
        dx: i32,
        /// Vertical offset
        #[arg(allow_negative_numbers = true)]
        dy: i32,
    },
    /// Multiply an emoji's size
    Scale {
        /// Glyph id
        id: GlyphId,
        /// Scale factor
        factor: f64,
    },
    /// Remove an emoji
    Remove {
        /// Glyph id
        id: GlyphId,
    },
    /// Set the background image, or clear it when no URL is given
    Background {
        /// Image URL (http, https, file or data)
        url: Option<Url>,
    },
    /// List palettes
    Palette {
        /// Only show this palette
        #[arg(long)]
        name: Option<String>,
    },
}

/// Editor configuration.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Directory the document is saved in.
    pub data_dir: PathBuf,
    /// Background transport settings.
    pub fetch: FetchConfig,
    /// Bound on waiting for a background fetch to finish.
    pub settle_timeout: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            fetch: FetchConfig::default(),
            settle_timeout: Duration::from_secs(DEFAULT_SETTLE_TIMEOUT_SECS),
        }
    }
}

impl From<CliArgs> for EditorConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            data_dir: args.data_dir,
            fetch: FetchConfig {
                timeout: args.fetch_timeout.map(Duration::from_secs),
                ..FetchConfig::default()
            },
            settle_timeout: Duration::from_secs(args.settle_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("emoji-art").chain(args.iter().copied()))
            .expect("parse")
    }

    #[test]
    fn test_add_defaults() {
        let args = parse(&["add", "🍎"]);
        assert_eq!(
            args.command,
            Command::Add {
                text: "🍎".to_string(),
                x: 0,
                y: 0,
                size: DEFAULT_GLYPH_SIZE,
            }
        );
    }

    #[test]
    fn test_negative_offsets() {
        let args = parse(&["move", "3", "10", "-5"]);
        assert_eq!(
            args.command,
            Command::Move {
                id: GlyphId::new(3),
                dx: 10,
                dy: -5,
            }
        );
    }

    #[test]
    fn test_background_without_url_clears() {
        let args = parse(&["background"]);
        assert_eq!(args.command, Command::Background { url: None });
    }

    #[test]
    fn test_invalid_id_rejected() {
        let result = CliArgs::try_parse_from(["emoji-art", "remove", "star"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_args() {
        let args = parse(&[
            "--data-dir",
            "/tmp/art",
            "--fetch-timeout",
            "7",
            "--settle-timeout",
            "2",
            "show",
        ]);
        let config = EditorConfig::from(args);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/art"));
        assert_eq!(config.fetch.timeout, Some(Duration::from_secs(7)));
        assert_eq!(config.settle_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_config_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.data_dir, PathBuf::from(".emoji-art"));
        assert!(config.fetch.timeout.is_none());
        assert_eq!(config.settle_timeout, Duration::from_secs(30));
    }
}
