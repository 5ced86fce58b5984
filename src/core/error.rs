//! Error taxonomy shared by the fetch, detail and portfolio layers.

use thiserror::Error;

/// Terminal outcome of a failed HTTP acquisition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("Rate limit exceeded, please wait a moment before retrying")]
    RateLimited,
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    InvalidBody(String),
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited)
    }

    /// Classifies a non-2xx status code.
    pub fn from_status(status: u16) -> Self {
        if status == 429 {
            FetchError::RateLimited
        } else {
            FetchError::Http { status }
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::InvalidBody(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("Incomplete data from API: {0}")]
    IncompleteData(String),
}

impl DetailError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, DetailError::Fetch(e) if e.is_rate_limited())
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("persisted portfolio is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl From<fjall::Error> for PersistenceError {
    fn from(err: fjall::Error) -> Self {
        PersistenceError::Backend(err.to_string())
    }
}
