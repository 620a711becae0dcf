//! Emoji palettes offered to the user for placing on the canvas.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Point size given to glyphs dropped from a palette.
pub const DEFAULT_GLYPH_SIZE: u32 = 40;

/// The palette every new editor starts with.
pub const DEFAULT_PALETTE: &str = "⭐️☁️🍎🍋🥝🍗🍔🍟";

/// A named run of emoji.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Display name.
    pub name: String,
    /// The emoji, concatenated.
    pub emojis: String,
}

impl Palette {
    /// Create a palette.
    #[must_use]
    pub fn new(name: impl Into<String>, emojis: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            emojis: emojis.into(),
        }
    }

    /// Split the palette into extended grapheme clusters, one per emoji.
    #[must_use]
    pub fn emojis(&self) -> Vec<String> {
        self.emojis.graphemes(true).map(str::to_string).collect()
    }
}

/// An ordered, cyclic collection of palettes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteSet {
    palettes: Vec<Palette>,
}

impl Default for PaletteSet {
    fn default() -> Self {
        Self {
            palettes: vec![Palette::new("Favorites", DEFAULT_PALETTE)],
        }
    }
}

impl PaletteSet {
    /// Create a set from palettes in display order.
    #[must_use]
    pub fn new(palettes: Vec<Palette>) -> Self {
        Self { palettes }
    }

    /// All palettes in display order.
    #[must_use]
    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    /// Find a palette by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Palette> {
        self.palettes.iter().find(|p| p.name == name)
    }

    /// Append a palette, replacing any existing palette with the same name.
    pub fn insert(&mut self, palette: Palette) {
        match self.palettes.iter_mut().find(|p| p.name == palette.name) {
            Some(existing) => *existing = palette,
            None => self.palettes.push(palette),
        }
    }

    /// The palette following `name`, wrapping around. Unknown names yield the
    /// first palette.
    #[must_use]
    pub fn after(&self, name: &str) -> Option<&Palette> {
        let len = self.palettes.len();
        let next = match self.position(name) {
            Some(index) => (index + 1) % len,
            None => 0,
        };
        self.palettes.get(next)
    }

    /// The palette preceding `name`, wrapping around. Unknown names yield the
    /// first palette.
    #[must_use]
    pub fn before(&self, name: &str) -> Option<&Palette> {
        let len = self.palettes.len();
        let prev = match self.position(name) {
            Some(index) => (index + len - 1) % len,
            None => 0,
        };
        self.palettes.get(prev)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.palettes.iter().position(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> PaletteSet {
        PaletteSet::new(vec![
            Palette::new("Food", "🍎🍋"),
            Palette::new("Weather", "☀️🌧"),
            Palette::new("Faces", "😀😎"),
        ])
    }

    #[test]
    fn test_default_palette_splits_into_eight() {
        let set = PaletteSet::default();
        let palette = set.get("Favorites").expect("default palette");
        let emojis = palette.emojis();
        assert_eq!(emojis.len(), 8);
        assert_eq!(emojis[0], "⭐\u{FE0F}");
        assert_eq!(emojis[7], "🍟");
    }

    #[test]
    fn test_zwj_sequence_stays_together() {
        let palette = Palette::new("Family", "👩\u{200D}💻👍🏽");
        assert_eq!(palette.emojis(), vec!["👩\u{200D}💻", "👍🏽"]);
    }

    #[test]
    fn test_flag_and_keycap_stay_together() {
        let emojis = "\u{1F1F0}\u{1F1F7}1\u{FE0F}\u{20E3}\u{1F1EF}\u{1F1F5}";
        let palette = Palette::new("Misc", emojis);
        assert_eq!(
            palette.emojis(),
            vec!["\u{1F1F0}\u{1F1F7}", "1\u{FE0F}\u{20E3}", "\u{1F1EF}\u{1F1F5}"]
        );
    }

    #[test]
    fn test_cycle_forward_and_back() {
        let set = three();
        assert_eq!(set.after("Food").map(|p| p.name.as_str()), Some("Weather"));
        assert_eq!(set.after("Faces").map(|p| p.name.as_str()), Some("Food"));
        assert_eq!(set.before("Food").map(|p| p.name.as_str()), Some("Faces"));
        assert_eq!(set.before("Weather").map(|p| p.name.as_str()), Some("Food"));
    }

    #[test]
    fn test_unknown_name_yields_first() {
        let set = three();
        assert_eq!(set.after("nope").map(|p| p.name.as_str()), Some("Food"));
        assert_eq!(set.before("nope").map(|p| p.name.as_str()), Some("Food"));
    }

    #[test]
    fn test_empty_set() {
        let set = PaletteSet::new(Vec::new());
        assert!(set.after("anything").is_none());
        assert!(set.before("anything").is_none());
    }

    #[test]
    fn test_insert_replaces_by_name() {
        let mut set = three();
        set.insert(Palette::new("Food", "🍔"));
        assert_eq!(set.palettes().len(), 3);
        assert_eq!(set.get("Food").map(|p| p.emojis.as_str()), Some("🍔"));
        set.insert(Palette::new("Animals", "🐶"));
        assert_eq!(set.palettes().len(), 4);
    }
}
