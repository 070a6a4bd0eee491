use crate::fetch::error::FetchError;
use log::{info, warn};
use reqwest::Client;

/// Marker the agencies redirect to while their sites are taken down.
const OUTAGE_MARKER: &str = "shutdown";

/// Downloads upstream documents as text.
///
/// One GET per call: no retries and no timeout beyond the client default.
#[derive(Debug, Clone, Default)]
pub struct RawFetcher {
    client: Client,
}

impl RawFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` and returns the body.
    ///
    /// # Errors
    ///
    /// * [`FetchError::Transport`] when the host cannot be reached.
    /// * [`FetchError::HttpStatus`] for a non-2xx status.
    /// * [`FetchError::UpstreamOutage`] when the final, post-redirect URL
    ///   contains `shutdown`.
    /// * [`FetchError::Body`] when reading the body fails.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        info!("Downloading data from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(match e.status() {
                    Some(status) => FetchError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    },
                    None => FetchError::Transport {
                        url: url.to_string(),
                        source: e,
                    },
                });
            }
        };

        if response.url().as_str().contains(OUTAGE_MARKER) {
            return Err(FetchError::UpstreamOutage {
                url: response.url().to_string(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        info!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
