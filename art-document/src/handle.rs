//! The observable document handle.
//!
//! [`DocumentHandle`] is the sole owner of the live [`Document`] and of the
//! background image resolved from it. Consumers read snapshots, issue intents,
//! and subscribe to change notifications.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use art_core::{MemoryStore, Position};
//! use art_document::DocumentHandle;
//!
//! # async fn run() -> Result<(), art_document::DocumentError> {
//! let handle = DocumentHandle::builder()
//!     .store(Arc::new(MemoryStore::new()))
//!     .open()?;
//!
//! handle.on_change(|| println!("document changed"));
//! if let Some(star) = handle.add_glyph("⭐", Position::ORIGIN, 40) {
//!     handle.move_glyph(star, Position::new(10, -5));
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use art_core::{
    decode, encode, normalize_image_url, ByteStore, Document, EmojiGlyph, GlyphId, MemoryStore,
    Position, DOCUMENT_KEY,
};
use tokio::runtime::Handle as RuntimeHandle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use url::Url;

use crate::notify::Observers;
use crate::{
    BackgroundImage, DocumentError, DocumentEvent, FetchConfig, FetchController, FetchError,
    FetchState, FetchTicket, Fetcher, ImageDecoder, RasterDecoder, SubscriptionId, UrlFetcher,
};

/// Configures and opens a [`DocumentHandle`].
#[derive(Debug)]
pub struct DocumentBuilder {
    store: Option<Arc<dyn ByteStore>>,
    key: String,
    fetcher: Option<Arc<dyn Fetcher>>,
    decoder: Arc<dyn ImageDecoder>,
    fetch_config: FetchConfig,
    runtime: Option<RuntimeHandle>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            store: None,
            key: DOCUMENT_KEY.to_string(),
            fetcher: None,
            decoder: Arc::new(RasterDecoder),
            fetch_config: FetchConfig::default(),
            runtime: None,
        }
    }
}

impl DocumentBuilder {
    /// Persist into `store`. Defaults to a fresh [`MemoryStore`].
    #[must_use]
    pub fn store(mut self, store: Arc<dyn ByteStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Persist under `key`. Defaults to [`DOCUMENT_KEY`].
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Retrieve backgrounds with `fetcher`. Defaults to a [`UrlFetcher`]
    /// built from the fetch configuration.
    #[must_use]
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Decode backgrounds with `decoder`. Defaults to [`RasterDecoder`].
    #[must_use]
    pub fn decoder(mut self, decoder: Arc<dyn ImageDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Configuration for the default [`UrlFetcher`].
    #[must_use]
    pub fn fetch_config(mut self, config: FetchConfig) -> Self {
        self.fetch_config = config;
        self
    }

    /// Spawn retrievals on `runtime` instead of the ambient one.
    #[must_use]
    pub fn runtime(mut self, runtime: RuntimeHandle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Open the document.
    ///
    /// Persisted bytes are loaded from the store. Missing or unreadable bytes
    /// yield an empty document. A persisted background reference starts its
    /// fetch immediately.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NoRuntime`] when no runtime was given and none
    /// is running, or [`DocumentError::Transport`] if the default fetcher
    /// cannot be built.
    pub fn open(self) -> Result<DocumentHandle, DocumentError> {
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => RuntimeHandle::try_current()?,
        };
        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(UrlFetcher::new(&self.fetch_config)?),
        };
        let store: Arc<dyn ByteStore> = match self.store {
            Some(store) => store,
            None => Arc::new(MemoryStore::new()),
        };

        let document = load_document(store.as_ref(), &self.key);
        let inner = Arc::new(Inner {
            state: Mutex::new(HandleState {
                document: Arc::new(document),
                controller: FetchController::new(),
                task: None,
            }),
            store,
            key: self.key,
            fetcher,
            decoder: self.decoder,
            runtime,
            observers: Observers::new(),
        });

        {
            let mut state = inner.lock();
            inner.restart_fetch(&mut state);
        }

        Ok(DocumentHandle { inner })
    }
}

/// Observable owner of one open document.
///
/// Cloning the handle yields another reference to the same document.
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    inner: Arc<Inner>,
}

impl DocumentHandle {
    /// Start configuring a handle.
    #[must_use]
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    // -----------------------------------------------------------------------
    // Read views
    // -----------------------------------------------------------------------

    /// The current document snapshot.
    #[must_use]
    pub fn model(&self) -> Arc<Document> {
        Arc::clone(&self.inner.lock().document)
    }

    /// The placed glyphs in z-order, bottom first.
    #[must_use]
    pub fn glyphs(&self) -> Vec<EmojiGlyph> {
        self.inner.lock().document.glyphs().to_vec()
    }

    /// The background image currently displayed, if any.
    #[must_use]
    pub fn image(&self) -> Option<BackgroundImage> {
        self.inner.lock().controller.image().cloned()
    }

    /// The background fetch state.
    #[must_use]
    pub fn fetch_state(&self) -> FetchState {
        self.inner.lock().controller.state().clone()
    }

    /// Whether a background retrieval is in flight.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.inner.lock().controller.state().is_fetching()
    }

    /// The current fetch generation.
    #[must_use]
    pub fn fetch_generation(&self) -> u64 {
        self.inner.lock().controller.generation()
    }

    /// Number of change notifications emitted so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.observers.revision()
    }

    /// Key the document is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    /// Place a new glyph and return its identity, or `None` once glyph
    /// identities are exhausted.
    pub fn add_glyph(
        &self,
        text: impl Into<String>,
        position: Position,
        size: u32,
    ) -> Option<GlyphId> {
        let text = text.into();
        let id = self.edit(|doc| doc.add_glyph(text, position, size));
        if let Some(id) = id {
            tracing::debug!("Added glyph {id}");
        }
        id
    }

    /// Move a glyph by `delta`. Unknown identities are ignored.
    pub fn move_glyph(&self, id: GlyphId, delta: Position) {
        self.edit(|doc| (doc.move_glyph(id, delta), ()));
    }

    /// Scale a glyph's size by `factor`. Unknown identities are ignored.
    pub fn scale_glyph(&self, id: GlyphId, factor: f64) {
        self.edit(|doc| (doc.scale_glyph(id, factor), ()));
    }

    /// Remove a glyph. Unknown identities are ignored.
    pub fn remove_glyph(&self, id: GlyphId) {
        self.edit(|doc| (doc.remove_glyph(id), ()));
    }

    /// Replace the background reference and restart the background fetch.
    ///
    /// The displayed image is cleared before this returns. Links carrying an
    /// embedded image URL are resolved to that URL first.
    pub fn set_background(&self, url: Option<Url>) {
        let url = url.map(normalize_image_url);
        {
            let mut state = self.inner.lock();
            let next = (*state.document).clone().set_background(url);
            self.inner.commit(&mut state, next);
            self.inner.restart_fetch(&mut state);
        }
        self.inner.observers.notify();
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Call `callback` after every change. The callback receives no payload;
    /// it should re-read the handle.
    pub fn on_change<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.observers.add(Arc::new(callback))
    }

    /// Stop a callback registered with [`on_change`](Self::on_change).
    /// Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.observers.remove(id)
    }

    /// Receive change events on an async channel.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DocumentEvent> {
        self.inner.observers.subscribe()
    }

    /// Wait until no background retrieval is in flight.
    ///
    /// A hung retrieval never settles; bound the wait with a timeout.
    pub async fn settled(&self) {
        let mut events = self.subscribe();
        while self.is_fetching() {
            match events.recv().await {
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return,
            }
        }
    }

    /// Apply a pure mutation, persist the result and notify once.
    fn edit<R>(&self, mutate: impl FnOnce(Document) -> (Document, R)) -> R {
        let result = {
            let mut state = self.inner.lock();
            let (next, result) = mutate((*state.document).clone());
            self.inner.commit(&mut state, next);
            result
        };
        self.inner.observers.notify();
        result
    }
}

#[derive(Debug)]
struct HandleState {
    document: Arc<Document>,
    controller: FetchController,
    task: Option<JoinHandle<()>>,
}

#[derive(Debug)]
struct Inner {
    /// Every change to the document or the fetch state happens under this lock.
    state: Mutex<HandleState>,
    store: Arc<dyn ByteStore>,
    key: String,
    fetcher: Arc<dyn Fetcher>,
    decoder: Arc<dyn ImageDecoder>,
    runtime: RuntimeHandle,
    observers: Observers,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, HandleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap in the next snapshot and autosave it.
    fn commit(&self, state: &mut HandleState, next: Document) {
        state.document = Arc::new(next);
        self.persist(&state.document);
    }

    /// Write the snapshot to the store. Failures are logged, never surfaced.
    fn persist(&self, document: &Document) {
        let bytes = match encode(document) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to encode document {}: {e}", self.key);
                return;
            }
        };
        if let Err(e) = self.store.put(&self.key, &bytes) {
            tracing::warn!("Failed to persist document {}: {e}", self.key);
        }
    }

    /// Supersede any in-flight retrieval and start one for the current
    /// background reference.
    ///
    /// Aborting only cancels a retrieval still waiting on the transport. Once
    /// bytes have arrived, decoding and completion run to the end on the
    /// blocking pool and [`Inner::complete`] discards them if superseded.
    fn restart_fetch(self: &Arc<Self>, state: &mut HandleState) {
        if let Some(task) = state.task.take() {
            task.abort();
        }
        let Some(ticket) = state
            .controller
            .restart(state.document.background().cloned())
        else {
            return;
        };

        let inner = Arc::downgrade(self);
        let fetcher = Arc::clone(&self.fetcher);
        let decoder = Arc::clone(&self.decoder);
        state.task = Some(self.runtime.spawn(async move {
            let fetched = fetcher.fetch(ticket.url()).await;
            let (decode_inner, decode_ticket) = (inner.clone(), ticket.clone());
            let decoded = tokio::task::spawn_blocking(move || {
                let outcome = fetched.and_then(|bytes| decoder.decode(&bytes));
                deliver(&decode_inner, &decode_ticket, outcome);
            })
            .await;
            if let Err(e) = decoded {
                deliver(&inner, &ticket, Err(FetchError::Task(e.to_string())));
            }
        }));
    }

    /// Apply a finished retrieval if it is still the live one.
    fn complete(&self, ticket: &FetchTicket, outcome: Result<BackgroundImage, FetchError>) {
        let applied = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let (image, failure) = match outcome {
                Ok(image) => (Some(image), None),
                Err(e) => (None, Some(e)),
            };
            let applied = state
                .controller
                .complete(ticket, state.document.background(), image);
            if applied {
                state.task = None;
                match failure {
                    Some(e) => tracing::warn!("Background {} unavailable: {e}", ticket.url()),
                    None => tracing::info!("Background {} resolved", ticket.url()),
                }
            }
            applied
        };
        if applied {
            self.observers.notify();
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = state.task.take() {
            task.abort();
        }
    }
}

/// Hand a finished retrieval to the handle, if it is still open.
fn deliver(
    inner: &Weak<Inner>,
    ticket: &FetchTicket,
    outcome: Result<BackgroundImage, FetchError>,
) {
    match inner.upgrade() {
        Some(inner) => inner.complete(ticket, outcome),
        None => tracing::debug!("Document closed before {} resolved", ticket.url()),
    }
}

/// Load the persisted document, falling back to an empty one.
fn load_document(store: &dyn ByteStore, key: &str) -> Document {
    match store.get(key) {
        Ok(Some(bytes)) => match decode(&bytes) {
            Ok(document) => {
                tracing::info!("Loaded document {key} with {} glyphs", document.len());
                document
            }
            Err(e) => {
                tracing::warn!("Persisted document {key} is unreadable, starting empty: {e}");
                Document::new()
            }
        },
        Ok(None) => {
            tracing::debug!("No persisted document under {key}, starting empty");
            Document::new()
        }
        Err(e) => {
            tracing::warn!("Failed to read document {key}, starting empty: {e}");
            Document::new()
        }
    }
}
