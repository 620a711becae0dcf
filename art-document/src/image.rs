//! Decoded background images.

use std::fmt;
use std::sync::Arc;

use crate::FetchError;

/// A decoded background image, ready for the rendering layer.
#[derive(Clone, PartialEq, Eq)]
pub struct BackgroundImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data (4 bytes per pixel), row-major, tightly packed.
    pub rgba8: Arc<Vec<u8>>,
}

impl BackgroundImage {
    /// Wrap already-decoded RGBA8 pixels.
    #[must_use]
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
        }
    }
}

// Pixel buffers are too large to be useful in debug output.
impl fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba8.len())
            .finish()
    }
}

/// Turns retrieved bytes into an image.
pub trait ImageDecoder: Send + Sync + fmt::Debug {
    /// Decode `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Decode`] if the bytes are not a supported image.
    fn decode(&self, bytes: &[u8]) -> Result<BackgroundImage, FetchError>;
}

/// Decoder for the raster formats supported by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<BackgroundImage, FetchError> {
        let format = ::image::guess_format(bytes).ok();
        let rgba = ::image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        tracing::debug!("Decoded {width}x{height} background ({format:?})");
        Ok(BackgroundImage::from_rgba8(width, height, rgba.into_raw()))
    }
}
