//! Background fetch state machine.
//!
//! ```text
//!            restart(None)                 restart(Some(url))
//!   ┌──────────────────────── Idle ─────────────────────────┐
//!   │                                                       ▼
//!   │          complete(image)                       Fetching(url)
//!   │   Resolved(url, image) ◄──────────────────────────────┤
//!   │                                                       │ complete(none)
//!   │                                      Failed(url) ◄────┘
//!   └── any state ── restart ──► Idle | Fetching  (generation += 1)
//! ```
//!
//! The controller does no I/O. The handle spawns the retrieval described by
//! the returned [`FetchTicket`] and hands the outcome back to
//! [`FetchController::complete`], which applies it only if the ticket is still
//! current.

use url::Url;

use crate::BackgroundImage;

/// Where the background image currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    /// No background reference.
    #[default]
    Idle,
    /// A retrieval for `url` is in flight.
    Fetching {
        /// URL being retrieved.
        url: Url,
    },
    /// The image for `url` was retrieved and decoded.
    Resolved {
        /// URL the image came from.
        url: Url,
        /// The decoded image.
        image: BackgroundImage,
    },
    /// Retrieval or decoding for `url` failed. Displays like `Idle`.
    Failed {
        /// URL that failed.
        url: Url,
    },
}

impl FetchState {
    /// The URL this state refers to, if any.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Idle => None,
            Self::Fetching { url } | Self::Resolved { url, .. } | Self::Failed { url } => Some(url),
        }
    }

    /// The image to display, if any.
    #[must_use]
    pub fn image(&self) -> Option<&BackgroundImage> {
        match self {
            Self::Resolved { image, .. } => Some(image),
            _ => None,
        }
    }

    /// Whether a retrieval is in flight.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching { .. })
    }
}

/// Identifies one started retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    url: Url,
}

impl FetchTicket {
    /// Generation the retrieval was started in.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// URL to retrieve.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Generation-guarded background state machine.
#[derive(Debug, Default)]
pub struct FetchController {
    generation: u64,
    state: FetchState,
}

impl FetchController {
    /// Create an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Current fetch generation. Every restart advances it.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Displayed image, present only in `Resolved`.
    #[must_use]
    pub fn image(&self) -> Option<&BackgroundImage> {
        self.state.image()
    }

    /// Start over for a new background reference.
    ///
    /// The displayed image is cleared immediately and every earlier ticket is
    /// invalidated. Returns the ticket to retrieve, or `None` when the
    /// reference was cleared.
    pub fn restart(&mut self, target: Option<Url>) -> Option<FetchTicket> {
        self.generation = self.generation.wrapping_add(1);
        match target {
            None => {
                tracing::debug!(generation = self.generation, "Background cleared");
                self.state = FetchState::Idle;
                None
            }
            Some(url) => {
                tracing::debug!(generation = self.generation, %url, "Background fetch started");
                self.state = FetchState::Fetching { url: url.clone() };
                Some(FetchTicket {
                    generation: self.generation,
                    url,
                })
            }
        }
    }

    /// Apply the outcome of the retrieval described by `ticket`.
    ///
    /// `active` is the document's background reference at completion time.
    /// The outcome is discarded unless the ticket belongs to the current
    /// generation, `active` still equals the ticket's URL, and the controller
    /// is still waiting for it. Returns whether the state changed.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        active: Option<&Url>,
        image: Option<BackgroundImage>,
    ) -> bool {
        let current = ticket.generation == self.generation
            && active == Some(&ticket.url)
            && self.state.is_fetching();
        if !current {
            tracing::debug!(
                ticket = ticket.generation,
                generation = self.generation,
                url = %ticket.url,
                "Discarding stale background result"
            );
            return false;
        }

        let url = ticket.url.clone();
        self.state = match image {
            Some(image) => FetchState::Resolved { url, image },
            None => FetchState::Failed { url },
        };
        true
    }
}
