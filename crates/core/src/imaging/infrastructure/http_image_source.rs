use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::imaging::domain::image_source::{ImageSource, ImageSourceError};
use crate::shared::constants::{FETCH_TIMEOUT_SECS, FETCH_USER_AGENT, MAX_IMAGE_BYTES};
use crate::shared::frame::Frame;

use super::image_decoder::decode_frame;

/// Fetches images over HTTP(S) with a blocking client.
///
/// Non-2xx responses are errors. One attempt per load, no retries. Bodies
/// larger than `max_bytes` are refused whether or not the server declares
/// their length.
pub struct HttpImageSource {
    client: Client,
    max_bytes: u64,
}

impl HttpImageSource {
    pub fn new() -> Result<Self, ImageSourceError> {
        Self::with_timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ImageSourceError> {
        let client = Client::builder()
            .user_agent(FETCH_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(ImageSourceError::Client)?;
        Ok(Self {
            client,
            max_bytes: MAX_IMAGE_BYTES,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl ImageSource for HttpImageSource {
    fn load(&self, location: &str) -> Result<Frame, ImageSourceError> {
        let fetch_err = |source: reqwest::Error| ImageSourceError::Fetch {
            url: location.to_string(),
            source,
        };

        let too_large = || ImageSourceError::TooLarge {
            url: location.to_string(),
            limit: self.max_bytes,
        };

        let response = self
            .client
            .get(location)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?;

        if response.content_length().is_some_and(|len| len > self.max_bytes) {
            return Err(too_large());
        }

        // One byte past the limit is enough to tell an oversized body apart
        let mut bytes = Vec::new();
        response
            .take(self.max_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|source| ImageSourceError::Read {
                path: location.into(),
                source,
            })?;
        if bytes.len() as u64 > self.max_bytes {
            return Err(too_large());
        }
        log::debug!("Fetched {} bytes from {location}", bytes.len());

        decode_frame(&bytes)
    }
}
