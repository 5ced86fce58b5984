//! Persisted holdings and their valuation against live prices.
use crate::core::asset::Asset;
use crate::core::error::PersistenceError;
use crate::core::store::KeyValueStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Key under which the whole holdings map is persisted.
pub const STORAGE_KEY: &str = "cryptoPortfolio";

/// Parses a user-typed amount. Anything that is not a finite, non-negative
/// number counts as zero.
pub fn parse_amount(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => {
            debug!("Coercing amount input '{}' to 0", raw);
            0.0
        }
    }
}

/// Asset id to held amount. Holds no prices; valuation always joins against
/// the latest market list.
pub struct PortfolioStore {
    holdings: BTreeMap<String, f64>,
    store: Arc<dyn KeyValueStore>,
}

impl PortfolioStore {
    /// Reads the persisted snapshot. A missing key is an empty portfolio; a
    /// corrupt snapshot is an error.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, PersistenceError> {
        let holdings = match store.get(STORAGE_KEY)? {
            Some(raw) => serde_json::from_str::<BTreeMap<String, f64>>(&raw)?,
            None => BTreeMap::new(),
        };
        debug!("Loaded {} portfolio entries", holdings.len());
        Ok(Self { holdings, store })
    }

    /// Sets the amount for `id` and persists the full map.
    pub fn upsert(&mut self, id: &str, raw_amount: &str) -> Result<(), PersistenceError> {
        let amount = parse_amount(raw_amount);
        let mut next = self.holdings.clone();
        next.insert(id.to_string(), amount);
        let snapshot = serde_json::to_string(&next)?;
        self.store.set(STORAGE_KEY, &snapshot)?;
        self.holdings = next;
        info!("Set holding {} = {}", id, amount);
        Ok(())
    }

    /// Empties the portfolio and deletes the persisted key.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.store.remove(STORAGE_KEY)?;
        self.holdings = BTreeMap::new();
        info!("Cleared portfolio");
        Ok(())
    }

    /// Sum of `amount * price` over held ids present in `assets`.
    pub fn total_value(&self, assets: &[Asset]) -> f64 {
        self.holdings
            .iter()
            .filter(|(_, amount)| **amount > 0.0)
            .filter_map(|(id, amount)| {
                assets
                    .iter()
                    .find(|a| &a.id == id)
                    .map(|a| a.current_price * amount)
            })
            .sum()
    }

    pub fn amount(&self, id: &str) -> f64 {
        self.holdings.get(id).copied().unwrap_or(0.0)
    }

    /// Value of one holding at `asset`'s price.
    pub fn value_of(&self, asset: &Asset) -> f64 {
        self.amount(&asset.id) * asset.current_price
    }

    /// Number of assets with a positive amount.
    pub fn held_count(&self) -> usize {
        self.holdings.values().filter(|a| **a > 0.0).count()
    }

    pub fn has_holdings(&self) -> bool {
        self.held_count() > 0
    }

    pub fn holdings(&self) -> &BTreeMap<String, f64> {
        &self.holdings
    }
}
