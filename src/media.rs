//! Downloading post media from the preview CDN.
//!
//! Media URLs extracted from the preview markup point at a CDN that serves
//! self-signed certificates, so certificate validation is disabled for
//! these requests specifically. Downloads are blocking, like the rest of
//! the scrape pipeline, and size-capped where the delivery platform caps
//! uploads.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{MediaSettings, BROWSER_USER_AGENT};

/// Errors from a media download.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("download failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("media server returned status {0}")]
    Status(u16),

    #[error("media exceeds the size limit ({0} bytes)")]
    TooLarge(u64),
}

/// Download a photo by its direct CDN URL.
pub fn download_photo(url: &str, settings: &MediaSettings) -> Result<Vec<u8>, MediaError> {
    download(url, Duration::from_secs(settings.photo_timeout_secs), None)
}

/// Download a video by its direct CDN URL, enforcing the upload size cap.
pub fn download_video(url: &str, settings: &MediaSettings) -> Result<Vec<u8>, MediaError> {
    download(
        url,
        Duration::from_secs(settings.video_timeout_secs),
        Some(settings.video_max_bytes),
    )
}

fn download(url: &str, timeout: Duration, max_bytes: Option<u64>) -> Result<Vec<u8>, MediaError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(timeout)
        // The media CDN serves self-signed certificates.
        .danger_accept_invalid_certs(true)
        .build()?;

    debug!(url, "downloading media");
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        warn!(url, status = status.as_u16(), "media download refused");
        return Err(MediaError::Status(status.as_u16()));
    }

    if let (Some(cap), Some(length)) = (max_bytes, response.content_length()) {
        if length > cap {
            return Err(MediaError::TooLarge(length));
        }
    }

    let bytes = response.bytes()?;
    if let Some(cap) = max_bytes {
        if bytes.len() as u64 > cap {
            return Err(MediaError::TooLarge(bytes.len() as u64));
        }
    }

    Ok(bytes.to_vec())
}
