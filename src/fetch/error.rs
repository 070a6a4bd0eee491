use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Non successful http request for {url}: target server returned status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Data source {url} is currently unavailable due to a US government shutdown")]
    UpstreamOutage { url: String },

    #[error("Failed reading the response body from {url}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Failures that are reported as "no data" instead of an error: the
    /// network or the server failed, not the data.
    pub fn is_soft(&self) -> bool {
        !matches!(self, FetchError::UpstreamOutage { .. })
    }

    /// Whether the failure means there is no usable connection to the host.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, FetchError::Transport { .. } | FetchError::Body { .. })
    }
}
