//! Market data source abstraction

use crate::core::asset::Asset;
use crate::core::error::FetchError;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Top assets by market cap, validated into typed records.
    async fn fetch_markets(&self) -> Result<Vec<Asset>, FetchError>;

    /// Raw detail payload for one asset.
    async fn fetch_detail(&self, id: &str) -> Result<Value, FetchError>;

    /// Raw 7-day chart payload for one asset.
    async fn fetch_chart(&self, id: &str) -> Result<Value, FetchError>;
}
