//! Error types for background retrieval and document handles.

use thiserror::Error;

/// Errors raised while retrieving or decoding a background image.
///
/// None of these reach the caller of an intent; the handle folds them into
/// the `Failed` fetch state.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP layer failed (connection, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} answered with HTTP status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Reading a local file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A `data:` URL could not be parsed.
    #[error("Malformed data URL: {0}")]
    DataUrl(String),

    /// The URL scheme has no transport.
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// The bytes are not a decodable image.
    #[error("Failed to decode image: {0}")]
    Decode(#[from] ::image::ImageError),

    /// The retrieval task ended without a result.
    #[error("Retrieval task failed: {0}")]
    Task(String),
}

/// Errors raised when opening a document handle.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The handle must be opened from within a tokio runtime.
    #[error("No tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// The default transport could not be built.
    #[error("Failed to build transport: {0}")]
    Transport(#[from] FetchError),
}
