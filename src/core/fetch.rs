//! Image source resolution: upload bytes or URL fetch into a decoded image.

use image::DynamicImage;

use crate::error::{AppError, Result};
use crate::models::product::ImageSource;

/// Default bound on a single image fetch.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Build the shared HTTP client used for image fetches.
///
/// The timeout applies to the whole request so a slow or unreachable host
/// fails after a bounded wait instead of hanging a request handler.
pub fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        // The builder only fails on TLS backend misconfiguration.
        .unwrap_or_default()
}

/// Resolve an image source into a decoded image.
///
/// Decode failures map to `InvalidImage`; network failures (transport
/// errors, timeouts, non-success statuses) map to `SourceUnavailable`.
pub async fn resolve_image(client: &reqwest::Client, source: &ImageSource) -> Result<DynamicImage> {
    let data = match source {
        ImageSource::Bytes(bytes) => bytes.clone(),
        ImageSource::Url(url) => fetch_url(client, url).await?,
    };

    image::load_from_memory(&data)
        .map_err(|e| AppError::InvalidImage(format!("failed to decode image: {}", e)))
}

async fn fetch_url(client: &reqwest::Client, url: &str) -> Result<bytes::Bytes> {
    log::debug!("Fetching image from {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::SourceUnavailable(format!("failed to fetch {}: {}", url, e)))?;

    let response = response.error_for_status().map_err(|e| {
        AppError::SourceUnavailable(format!("fetch of {} returned an error status: {}", url, e))
    })?;

    response
        .bytes()
        .await
        .map_err(|e| AppError::SourceUnavailable(format!("failed to read body of {}: {}", url, e)))
}
