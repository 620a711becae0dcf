//! # Emoji Art Document
//!
//! The observable document handle: the single owner of the live
//! [`Document`](art_core::Document) and of the background image resolved from
//! its URL.
//!
//! ## Flow
//!
//! ```text
//! intent ──► pure mutation ──► snapshot swap ──► autosave ──► notify
//!                                   │
//!                     background ───┴──► FetchController::restart
//!                                               │
//!                         spawned task: fetch ──► decode
//!                                               │
//!                 handle lock: staleness guard ──► image ──► notify
//! ```
//!
//! All state changes, including the completion of a background fetch, happen
//! under the handle's lock. A fetch that has been superseded is aborted and,
//! should it still finish, is discarded by its generation and URL check.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;
pub mod error;
pub mod fetch;
pub mod handle;
pub mod image;
pub mod notify;

pub use controller::{FetchController, FetchState, FetchTicket};
pub use error::{DocumentError, FetchError};
pub use fetch::{FetchConfig, Fetcher, UrlFetcher};
pub use handle::{DocumentBuilder, DocumentHandle};
pub use image::{BackgroundImage, ImageDecoder, RasterDecoder};
pub use notify::{DocumentEvent, SubscriptionId};
