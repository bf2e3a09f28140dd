//! HTTP client for the gateway's auxiliary endpoints.

use devsync_shared::{ApiError, Ecosystem, PairingArtifact};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// HTTP client for one gateway.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: String::new(),
        }
    }

    /// Set the base URL for API requests
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if self.base_url.is_empty() {
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            }
        } else {
            let base = self.base_url.trim_end_matches('/');
            let path = path.trim_start_matches('/');
            format!("{base}/{path}")
        }
    }

    /// Make a GET request and decode the JSON body
    pub async fn get_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let is_success = resp.status().is_success();

        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

        if !is_success {
            return Err(ApiError::Http { status, body: text });
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Deserialize(e.to_string()))
    }

    /// Fetch the pairing QR code and PIN for an ecosystem.
    ///
    /// The QR payload is checked to be valid base64 before it is returned.
    pub async fn fetch_pairing(&self, ecosystem: Ecosystem) -> Result<PairingArtifact, ApiError> {
        let artifact: PairingArtifact = self
            .get_json(&format!("/qr/{}", ecosystem.slug()))
            .await
            .inspect_err(|e| {
                warn!(ecosystem = ecosystem.slug(), error = %e, "pairing fetch failed")
            })?;
        artifact.image_bytes()?;
        Ok(artifact)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
