use super::fetcher::ResilientFetcher;
use crate::core::asset::{Asset, parse_market_list};
use crate::core::error::FetchError;
use crate::core::provider::MarketDataProvider;
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

// CoinGeckoProvider implementation for MarketDataProvider
pub struct CoinGeckoProvider {
    base_url: String,
    fetcher: ResilientFetcher,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, fetcher: ResilientFetcher) -> Self {
        CoinGeckoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            fetcher,
        }
    }

    fn markets_url(&self) -> String {
        format!(
            "{}/coins/markets?vs_currency=usd&order=market_cap_desc&per_page=50&page=1&sparkline=false&price_change_percentage=24h",
            self.base_url
        )
    }

    /// `{base}/coins/{id}/{tail..}` with `id` as a single escaped path
    /// segment.
    fn coin_url(&self, id: &str, tail: &[&str]) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("coins")
            .push(id)
            .extend(tail);
        Ok(url)
    }

    fn detail_url(&self, id: &str) -> Result<Url, FetchError> {
        self.coin_url(id, &[])
    }

    fn chart_url(&self, id: &str) -> Result<Url, FetchError> {
        let mut url = self.coin_url(id, &["market_chart"])?;
        url.query_pairs_mut()
            .append_pair("vs_currency", "usd")
            .append_pair("days", "7");
        Ok(url)
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    #[instrument(name = "CoinGeckoMarkets", skip(self))]
    async fn fetch_markets(&self) -> Result<Vec<Asset>, FetchError> {
        let value = self.fetcher.fetch_json(&self.markets_url()).await?;
        let assets = parse_market_list(value).map_err(|e| {
            FetchError::InvalidBody(format!("Failed to parse market list: {e}"))
        })?;
        debug!("Received {} market records", assets.len());
        Ok(assets)
    }

    async fn fetch_detail(&self, id: &str) -> Result<Value, FetchError> {
        self.fetcher.fetch_json(self.detail_url(id)?.as_str()).await
    }

    async fn fetch_chart(&self, id: &str) -> Result<Value, FetchError> {
        self.fetcher.fetch_json(self.chart_url(id)?.as_str()).await
    }
}
