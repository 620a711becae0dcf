//! Retrieval of background image bytes.
//!
//! [`UrlFetcher`] handles `http`/`https` through `reqwest`, `file` URLs from
//! the local filesystem, and inline `data:` URLs. There is no retry: a failed
//! retrieval leaves the canvas without a background.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use url::Url;

use crate::FetchError;

/// Asynchronous byte retrieval for a URL.
#[async_trait]
pub trait Fetcher: Send + Sync + fmt::Debug {
    /// Retrieve the bytes behind `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the bytes cannot be retrieved.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// `User-Agent` header sent with HTTP requests.
    pub user_agent: String,
    /// Overall request timeout. `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("emoji-art/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
        }
    }
}

/// Default [`Fetcher`] dispatching on the URL scheme.
#[derive(Debug, Clone)]
pub struct UrlFetcher {
    http: Client,
}

impl UrlFetcher {
    /// Build a fetcher from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the HTTP client fails to build.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            // Disable proxy detection to avoid macOS system-configuration panic
            .no_proxy();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    async fn fetch_http(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    async fn fetch_file(url: &Url) -> Result<Vec<u8>, FetchError> {
        let path = url
            .to_file_path()
            .map_err(|()| FetchError::UnsupportedScheme(format!("non-local file URL {url}")))?;
        Ok(tokio::fs::read(path).await?)
    }
}

#[async_trait]
impl Fetcher for UrlFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        tracing::debug!("Fetching {url}");
        match url.scheme() {
            "http" | "https" => self.fetch_http(url).await,
            "file" => Self::fetch_file(url).await,
            "data" => decode_data_url(url),
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Decode the payload of a `data:` URL.
///
/// Supports both `;base64` and percent-encoded payloads, e.g.
/// `data:image/png;base64,iVBORw0KGgo...`.
fn decode_data_url(url: &Url) -> Result<Vec<u8>, FetchError> {
    let body = url.path();
    let (metadata, payload) = body
        .split_once(',')
        .ok_or_else(|| FetchError::DataUrl("missing comma".to_string()))?;

    if metadata.ends_with(";base64") {
        let payload: String = percent_encoding::percent_decode_str(payload)
            .decode_utf8_lossy()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| FetchError::DataUrl(format!("invalid base64: {e}")))
    } else {
        Ok(percent_encoding::percent_decode_str(payload).collect())
    }
}
