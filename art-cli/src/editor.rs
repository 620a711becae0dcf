//! One editing session against the autosaved document.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{bail, Context};
use art_core::{Document, FileStore, GlyphId, PaletteSet, Position};
use art_document::{DocumentHandle, FetchState};

use crate::{Command, EditorConfig};

/// Runs commands against the document saved in the data directory.
#[derive(Debug)]
pub struct Editor {
    handle: DocumentHandle,
    palettes: PaletteSet,
    config: EditorConfig,
}

impl Editor {
    /// Open the document saved under `config.data_dir`.
    ///
    /// Must be called within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails if the data directory cannot be created or the document handle
    /// cannot be opened.
    pub fn open(config: EditorConfig) -> anyhow::Result<Self> {
        let store = FileStore::new(config.data_dir.clone()).with_context(|| {
            format!("failed to open data directory {}", config.data_dir.display())
        })?;
        let handle = DocumentHandle::builder()
            .store(Arc::new(store))
            .fetch_config(config.fetch.clone())
            .open()
            .context("failed to open document")?;
        Ok(Self {
            handle,
            palettes: PaletteSet::default(),
            config,
        })
    }

    /// The underlying document handle.
    #[must_use]
    pub fn handle(&self) -> &DocumentHandle {
        &self.handle
    }

    /// Run `command` and return the report to print.
    ///
    /// # Errors
    ///
    /// Fails when the command names a palette that does not exist. Intents
    /// naming a missing glyph change nothing and still succeed.
    pub async fn run(&self, command: Command) -> anyhow::Result<String> {
        match command {
            Command::Show => Ok(render(&self.handle.model(), &self.handle.fetch_state())),
            Command::Add { text, x, y, size } => {
                match self.handle.add_glyph(text, Position::new(x, y), size) {
                    Some(id) => Ok(self.report("Added", id)),
                    None => Ok("Glyph identities exhausted; nothing added".to_string()),
                }
            }
            Command::Move { id, dx, dy } => {
                self.handle.move_glyph(id, Position::new(dx, dy));
                Ok(self.report("Moved", id))
            }
            Command::Scale { id, factor } => {
                self.handle.scale_glyph(id, factor);
                Ok(self.report("Scaled", id))
            }
            Command::Remove { id } => {
                let existed = self.handle.model().glyph(id).is_some();
                self.handle.remove_glyph(id);
                if existed {
                    Ok(format!("Removed #{id}"))
                } else {
                    Ok(unchanged(id))
                }
            }
            Command::Background { url } => {
                self.handle.set_background(url);
                self.settle().await;
                Ok(describe_background(&self.handle.fetch_state()))
            }
            Command::Palette { name } => self.palettes(name.as_deref()),
        }
    }

    async fn settle(&self) {
        let wait = tokio::time::timeout(self.config.settle_timeout, self.handle.settled());
        if wait.await.is_err() {
            tracing::warn!(
                "Background still loading after {:?}",
                self.config.settle_timeout
            );
        }
    }

    /// Describe glyph `id` after an intent. Missing glyphs are not an error.
    fn report(&self, verb: &str, id: GlyphId) -> String {
        match self.handle.model().glyph(id) {
            Some(glyph) => format!("{verb} {glyph}"),
            None => unchanged(id),
        }
    }

    fn palettes(&self, name: Option<&str>) -> anyhow::Result<String> {
        let selected: Vec<_> = match name {
            Some(name) => match self.palettes.get(name) {
                Some(palette) => vec![palette],
                None => bail!("no palette named {name:?}"),
            },
            None => self.palettes.palettes().iter().collect(),
        };
        let mut out = String::new();
        for palette in selected {
            let _ = writeln!(out, "{}: {}", palette.name, palette.emojis().join(" "));
        }
        Ok(out.trim_end().to_string())
    }
}

fn unchanged(id: GlyphId) -> String {
    format!("No glyph #{id}; nothing changed")
}

/// Human-readable listing of a document.
fn render(document: &Document, fetch: &FetchState) -> String {
    let mut out = String::new();
    match document.background() {
        Some(_) => {
            let _ = writeln!(out, "{}", describe_background(fetch));
        }
        None => out.push_str("Background: none\n"),
    }
    let _ = writeln!(out, "Glyphs: {}", document.len());
    for glyph in document.glyphs() {
        let _ = writeln!(out, "  {glyph}");
    }
    out.trim_end().to_string()
}

fn describe_background(fetch: &FetchState) -> String {
    match fetch {
        FetchState::Idle => "Background: none".to_string(),
        FetchState::Fetching { url } => format!("Background: {url} (loading)"),
        FetchState::Resolved { url, image } => {
            format!("Background: {url} ({}x{})", image.width, image.height)
        }
        FetchState::Failed { url } => format!("Background: {url} (unavailable)"),
    }
}
