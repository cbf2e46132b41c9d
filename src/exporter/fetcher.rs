//! Content fetching: resolving a descriptor's signed URL to bytes.

use async_trait::async_trait;

use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::types::MediaDescriptor;

/// A successfully fetched media object: its descriptor plus content bytes
pub struct FetchedMedia {
    /// The descriptor the bytes were fetched for
    pub descriptor: MediaDescriptor,
    /// The object's content
    pub bytes: Vec<u8>,
}

/// Resolves a media descriptor to its content bytes
///
/// Injected into the exporter (no ambient HTTP client singleton), so the
/// pipeline is testable without a network and callers control
/// authentication on the underlying client.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the content for one descriptor
    ///
    /// An expired signed URL surfaces as a [`FetchError`], never a panic.
    async fn fetch(
        &self,
        descriptor: &MediaDescriptor,
    ) -> std::result::Result<Vec<u8>, FetchError>;
}

/// HTTP-backed content fetcher for signed storage URLs
pub struct HttpContentFetcher {
    client: reqwest::Client,
}

impl HttpContentFetcher {
    /// Wrap an existing client (bring your own authentication/middleware)
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a fetcher with the configured request timeout
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(
        &self,
        descriptor: &MediaDescriptor,
    ) -> std::result::Result<Vec<u8>, FetchError> {
        let url = url::Url::parse(&descriptor.content_url)
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(classify_transport_error)?;
        Ok(bytes.to_vec())
    }
}

fn classify_transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(e.to_string())
    }
}
