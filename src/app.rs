//! Per-action orchestration over the market list, detail view and portfolio.
//!
//! `App` is the single owner of all view state. Every update replaces whole
//! values, so a later refresh simply overwrites an earlier one.

use crate::core::asset::AssetDetail;
use crate::core::error::{DetailError, FetchError, PersistenceError};
use crate::core::market::{MarketView, PriceRange, SortKey};
use crate::core::portfolio::PortfolioStore;
use crate::core::provider::MarketDataProvider;
use anyhow::{Result, anyhow};
use std::sync::Arc;
use tracing::{debug, warn};

/// User-facing text for a failed list refresh.
pub fn list_error_message(err: &FetchError) -> String {
    if err.is_rate_limited() {
        format!("{err}\nTry refreshing again in a few seconds.")
    } else {
        format!("Failed to fetch market data: {err}\nTry refreshing again in a few seconds.")
    }
}

/// User-facing text for a failed detail load.
pub fn detail_error_message(err: &DetailError) -> String {
    match err {
        DetailError::Fetch(e) if e.is_rate_limited() => {
            format!("{e}\nTry again in a few seconds.")
        }
        DetailError::Fetch(e) => format!("Failed to load asset detail: {e}"),
        DetailError::IncompleteData(_) => err.to_string(),
    }
}

pub struct App {
    provider: Arc<dyn MarketDataProvider>,
    market: MarketView,
    portfolio: Option<PortfolioStore>,
    portfolio_error: Option<String>,
    selected: Option<AssetDetail>,
    error: Option<String>,
}

impl App {
    /// A failed portfolio load disables only the portfolio feature.
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        portfolio: Result<PortfolioStore, PersistenceError>,
    ) -> Self {
        let (portfolio, portfolio_error) = match portfolio {
            Ok(store) => (Some(store), None),
            Err(e) => {
                warn!("Portfolio unavailable: {}", e);
                (None, Some(e.to_string()))
            }
        };
        Self {
            provider,
            market: MarketView::new(),
            portfolio,
            portfolio_error,
            selected: None,
            error: None,
        }
    }

    /// Fetches a fresh list. On failure the list is emptied rather than left
    /// stale.
    pub async fn refresh(&mut self) -> Result<(), FetchError> {
        self.error = None;
        match self.provider.fetch_markets().await {
            Ok(assets) => {
                debug!("Refreshed {} assets", assets.len());
                self.market.replace_assets(assets);
                Ok(())
            }
            Err(e) => {
                self.error = Some(list_error_message(&e));
                self.market.replace_assets(Vec::new());
                Err(e)
            }
        }
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        self.market.set_range(range);
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.market.sort_by(key);
    }

    /// Loads the composite detail; nothing is selected unless both parts
    /// arrived and validated.
    pub async fn open_detail(&mut self, id: &str) -> Result<&AssetDetail, DetailError> {
        self.error = None;
        self.selected = None;
        match crate::core::detail::load_detail(self.provider.as_ref(), id).await {
            Ok(detail) => Ok(&*self.selected.insert(detail)),
            Err(e) => {
                self.error = Some(detail_error_message(&e));
                Err(e)
            }
        }
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
        self.error = None;
    }

    pub fn edit_amount(&mut self, id: &str, raw_amount: &str) -> Result<()> {
        self.portfolio_mut()?.upsert(id, raw_amount)?;
        Ok(())
    }

    pub fn clear_portfolio(&mut self) -> Result<()> {
        self.portfolio_mut()?.clear()?;
        Ok(())
    }

    /// Portfolio total against the current list; zero when the portfolio is
    /// unavailable.
    pub fn portfolio_value(&self) -> f64 {
        self.portfolio
            .as_ref()
            .map_or(0.0, |p| p.total_value(self.market.assets()))
    }

    fn portfolio_mut(&mut self) -> Result<&mut PortfolioStore> {
        match self.portfolio.as_mut() {
            Some(p) => Ok(p),
            None => Err(anyhow!(
                "Portfolio is unavailable: {}",
                self.portfolio_error.as_deref().unwrap_or("not loaded")
            )),
        }
    }

    pub fn portfolio(&self) -> Option<&PortfolioStore> {
        self.portfolio.as_ref()
    }

    pub fn portfolio_error(&self) -> Option<&str> {
        self.portfolio_error.as_deref()
    }

    pub fn market(&self) -> &MarketView {
        &self.market
    }

    pub fn selected(&self) -> Option<&AssetDetail> {
        self.selected.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::asset::Asset;
    use crate::core::asset::tests::bitcoin_detail_json;
    use crate::core::market::tests::asset;
    use crate::core::portfolio::STORAGE_KEY;
    use crate::core::store::KeyValueStore;
    use crate::store::memory::MemoryStore;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    struct ScriptedProvider {
        markets: Mutex<Vec<Result<Vec<Asset>, FetchError>>>,
        chart: Result<Value, FetchError>,
    }

    impl ScriptedProvider {
        fn new(markets: Vec<Result<Vec<Asset>, FetchError>>) -> Self {
            Self {
                markets: Mutex::new(markets),
                chart: Ok(json!({"prices": [[1700000000000.0, 50000.0]]})),
            }
        }
    }

    #[async_trait]
    impl MarketDataProvider for ScriptedProvider {
        async fn fetch_markets(&self) -> Result<Vec<Asset>, FetchError> {
            self.markets.lock().unwrap().remove(0)
        }

        async fn fetch_detail(&self, _id: &str) -> Result<Value, FetchError> {
            Ok(bitcoin_detail_json())
        }

        async fn fetch_chart(&self, _id: &str) -> Result<Value, FetchError> {
            self.chart.clone()
        }
    }

    fn portfolio() -> Result<PortfolioStore, PersistenceError> {
        PortfolioStore::load(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_failed_refresh_empties_list() {
        let provider = ScriptedProvider::new(vec![
            Ok(vec![asset("btc", 50000.0, 1)]),
            Err(FetchError::Http { status: 503 }),
        ]);
        let mut app = App::new(Arc::new(provider), portfolio());

        app.refresh().await.unwrap();
        assert_eq!(app.market().visible().len(), 1);

        let err = app.refresh().await.unwrap_err();
        assert_eq!(err, FetchError::Http { status: 503 });
        assert!(app.market().assets().is_empty());
        assert!(app.error().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_rate_limit_message_is_specific() {
        let provider = ScriptedProvider::new(vec![Err(FetchError::RateLimited)]);
        let mut app = App::new(Arc::new(provider), portfolio());
        let _ = app.refresh().await;
        let message = app.error().unwrap();
        assert!(message.starts_with("Rate limit exceeded"));
        assert!(!message.contains("Failed to fetch"));
    }

    #[tokio::test]
    async fn test_valuation_follows_latest_list() {
        let provider = ScriptedProvider::new(vec![
            Ok(vec![asset("A", 10.0, 1), asset("B", 4.0, 2)]),
            Ok(vec![asset("A", 12.0, 1)]),
        ]);
        let mut app = App::new(Arc::new(provider), portfolio());
        app.edit_amount("A", "2").unwrap();
        app.edit_amount("B", "5").unwrap();

        app.refresh().await.unwrap();
        assert_eq!(app.portfolio_value(), 40.0);

        app.refresh().await.unwrap();
        assert_eq!(app.portfolio_value(), 24.0);
    }

    #[tokio::test]
    async fn test_corrupt_portfolio_does_not_block_market() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::with_entry(STORAGE_KEY, "]["));
        let provider = ScriptedProvider::new(vec![Ok(vec![asset("btc", 1.0, 1)])]);
        let mut app = App::new(Arc::new(provider), PortfolioStore::load(store));

        assert!(app.portfolio().is_none());
        assert!(app.portfolio_error().is_some());
        app.refresh().await.unwrap();
        assert_eq!(app.market().visible().len(), 1);
        assert_eq!(app.portfolio_value(), 0.0);
        assert!(app.edit_amount("btc", "1").is_err());
    }

    #[tokio::test]
    async fn test_failed_detail_leaves_nothing_selected() {
        let mut provider = ScriptedProvider::new(vec![]);
        provider.chart = Ok(json!({"market_caps": []}));
        let mut app = App::new(Arc::new(provider), portfolio());

        let err = app.open_detail("bitcoin").await.unwrap_err();
        assert!(matches!(err, DetailError::IncompleteData(_)));
        assert!(app.selected().is_none());
        assert!(app.error().unwrap().starts_with("Incomplete data"));
    }

    #[tokio::test]
    async fn test_open_and_close_detail() {
        let provider = ScriptedProvider::new(vec![]);
        let mut app = App::new(Arc::new(provider), portfolio());
        let detail = app.open_detail("bitcoin").await.unwrap();
        assert_eq!(detail.asset.symbol, "btc");
        assert!(app.selected().is_some());
        app.close_detail();
        assert!(app.selected().is_none());
    }
}
