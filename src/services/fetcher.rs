// src/services/fetcher.rs

//! Standings page fetching.
//!
//! A fetch failure is never fatal: the poller logs it and skips the cycle,
//! so the client timeout is the only cancellation applied to a request.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::FetcherConfig;

/// Source of raw standings markup.
///
/// The poller talks to standings through this trait so cycles can be driven
/// from canned markup in tests.
#[async_trait]
pub trait StandingsSource: Send + Sync {
    /// Fetch the raw markup behind `url`.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP-backed standings source.
pub struct HttpStandingsSource {
    client: reqwest::Client,
}

impl HttpStandingsSource {
    /// Build a source with a configured client (user agent + timeout).
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl StandingsSource for HttpStandingsSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        let text = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_from_defaults() {
        assert!(HttpStandingsSource::new(&FetcherConfig::default()).is_ok());
    }
}
