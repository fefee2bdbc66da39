//! Network fetch abstraction
//!
//! Caching strategies talk to the network through the `Fetcher` trait so
//! tests can substitute deterministic responses.

use crate::error::{VibesError, VibesResult};
use async_trait::async_trait;
use std::time::Duration;

/// A fetched (or synthesized) response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchedResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues GET requests for the caching layer
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> VibesResult<FetchedResponse>;
}

/// Real fetcher backed by reqwest
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> VibesResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("study-vibes/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VibesError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> VibesResult<FetchedResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| VibesError::fetch(url, e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = response
            .bytes()
            .await
            .map_err(|e| VibesError::fetch(url, e.to_string()))?
            .to_vec();

        Ok(FetchedResponse {
            status,
            content_type,
            body,
        })
    }
}

/// 1x1 transparent PNG served when an image asset is unreachable
const TRANSPARENT_PIXEL: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Synthetic empty script returned when the player bootstrap cannot be
/// fetched, so startup degrades instead of failing
pub fn empty_script() -> FetchedResponse {
    FetchedResponse {
        status: 200,
        content_type: Some("application/javascript".to_string()),
        body: vec![],
    }
}

/// Placeholder for unreachable image assets
pub fn image_placeholder() -> FetchedResponse {
    FetchedResponse {
        status: 200,
        content_type: Some("image/png".to_string()),
        body: TRANSPARENT_PIXEL.to_vec(),
    }
}

/// Placeholder for unreachable video assets
pub fn video_placeholder() -> FetchedResponse {
    FetchedResponse {
        status: 404,
        content_type: None,
        body: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_covers_2xx_only() {
        let mut resp = empty_script();
        assert!(resp.ok());
        resp.status = 304;
        assert!(!resp.ok());
        resp.status = 404;
        assert!(!resp.ok());
    }

    #[test]
    fn image_placeholder_is_png() {
        let resp = image_placeholder();
        assert!(resp.ok());
        assert_eq!(&resp.body[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn video_placeholder_is_empty_404() {
        let resp = video_placeholder();
        assert_eq!(resp.status, 404);
        assert!(resp.body.is_empty());
    }
}
