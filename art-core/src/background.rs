//! Background reference normalization.

use url::Url;

/// Query parameter image-search result links use to carry the real image.
const IMAGE_URL_PARAM: &str = "imgurl";

/// Resolve the URL that actually points at the image.
///
/// Links dragged out of image-search results wrap the image location in an
/// `imgurl` query parameter. When that parameter holds a valid URL it is
/// returned; otherwise `url` is returned unchanged.
///
/// ```
/// use art_core::normalize_image_url;
/// use url::Url;
///
/// let dropped = Url::parse(
///     "https://images.example.com/imgres?imgurl=https%3A%2F%2Fcdn.example.com%2Fsky.png&w=640",
/// ).unwrap();
/// assert_eq!(normalize_image_url(dropped).as_str(), "https://cdn.example.com/sky.png");
/// ```
#[must_use]
pub fn normalize_image_url(url: Url) -> Url {
    let embedded = url
        .query_pairs()
        .find(|(key, _)| key == IMAGE_URL_PARAM)
        .and_then(|(_, value)| Url::parse(&value).ok());
    match embedded {
        Some(image) => {
            tracing::debug!("Resolved embedded image URL {image} from {url}");
            image
        }
        None => url,
    }
}
