//! Downloads centre icons by URL with size and time bounds.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::AppError;

/// Fetches icon bytes over HTTP(S) before they are handed to the generator.
#[derive(Debug, Clone)]
pub struct IconFetcher {
    client: Client,
    max_bytes: usize,
}

impl IconFetcher {
    /// Create a fetcher with a per-request `timeout` and a `max_bytes` body cap.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, max_bytes })
    }

    /// Largest icon body accepted, in bytes.
    #[must_use]
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Reject an icon body that exceeds the cap.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidArgument`] when `len` is over the limit.
    pub fn check_len(&self, len: usize) -> Result<(), AppError> {
        if len > self.max_bytes {
            Err(AppError::InvalidArgument(format!("icon exceeds {} bytes", self.max_bytes)))
        } else {
            Ok(())
        }
    }

    /// Download the icon at `url`.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidArgument`] if the URL is malformed, not http(s), or
    ///   the body is larger than the cap.
    /// - [`AppError::IconFetch`] if the server answers with a non-success status.
    /// - [`AppError::Network`] on connection errors and timeouts.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let parsed = Url::parse(url)
            .map_err(|e| AppError::InvalidArgument(format!("invalid icon_url: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::InvalidArgument("icon_url must use http or https".to_string()));
        }

        tracing::debug!(%parsed, "fetching icon");
        let mut response = self.client.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::IconFetch(format!("{url} returned {status}")));
        }

        let limit = u64::try_from(self.max_bytes).unwrap_or(u64::MAX);
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(AppError::InvalidArgument(format!("icon exceeds {} bytes", self.max_bytes)));
        }

        // Content-Length may be absent or wrong; enforce the cap while streaming.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            self.check_len(body.len() + chunk.len())?;
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(bytes = body.len(), "icon fetched");
        Ok(body)
    }
}
