//! Retrying JSON GET with rate-limit classification.

use super::util::{Backoff, TokioBackoff, with_retry};
use crate::core::error::FetchError;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Duration::from_millis(1000),
        }
    }
}

/// Wraps single HTTP GETs with bounded retry and a fixed backoff.
///
/// No caching or request coalescing; every call is independent.
#[derive(Clone)]
pub struct ResilientFetcher {
    client: reqwest::Client,
    policy: RetryPolicy,
    backoff: Arc<dyn Backoff>,
}

impl ResilientFetcher {
    pub fn new(user_agent: &str, policy: RetryPolicy) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            policy,
            backoff: Arc::new(TokioBackoff),
        })
    }

    pub fn with_backoff(mut self, backoff: Arc<dyn Backoff>) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        self.fetch_json_with(url, self.policy).await
    }

    #[instrument(name = "FetchJson", skip(self, policy))]
    pub async fn fetch_json_with(&self, url: &str, policy: RetryPolicy) -> Result<Value, FetchError> {
        with_retry(
            || self.attempt(url),
            policy.max_retries,
            policy.backoff,
            self.backoff.as_ref(),
        )
        .await
    }

    async fn attempt(&self, url: &str) -> Result<Value, FetchError> {
        debug!("Requesting {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status.as_u16()));
        }
        Ok(response.json::<Value>().await?)
    }
}
