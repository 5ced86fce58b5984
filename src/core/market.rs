//! Price filtering and sortable ordering over the market list.

use crate::core::asset::Asset;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

/// Inclusive price bounds; `None` leaves that side open.
///
/// An inverted range (`min > max`) is allowed and simply matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min.unwrap_or(0.0) && price <= self.max.unwrap_or(f64::INFINITY)
    }
}

/// Quick-pick price bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricePreset {
    UnderOne,
    OneToTen,
    TenToHundred,
    HundredToThousand,
    OverThousand,
}

impl PricePreset {
    pub fn range(&self) -> PriceRange {
        match self {
            PricePreset::UnderOne => PriceRange::new(Some(0.0), Some(1.0)),
            PricePreset::OneToTen => PriceRange::new(Some(1.0), Some(10.0)),
            PricePreset::TenToHundred => PriceRange::new(Some(10.0), Some(100.0)),
            PricePreset::HundredToThousand => PriceRange::new(Some(100.0), Some(1000.0)),
            PricePreset::OverThousand => PriceRange::new(Some(1000.0), None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    Rank,
    Price,
    Change24h,
    MarketCap,
}

impl SortKey {
    fn value(&self, asset: &Asset) -> f64 {
        match self {
            SortKey::Rank => asset.market_cap_rank as f64,
            SortKey::Price => asset.current_price,
            SortKey::Change24h => asset.price_change_pct_24h,
            SortKey::MarketCap => asset.market_cap,
        }
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rank" => Ok(SortKey::Rank),
            "price" => Ok(SortKey::Price),
            "change" | "change24h" | "24h" => Ok(SortKey::Change24h),
            "cap" | "marketcap" | "market-cap" => Ok(SortKey::MarketCap),
            _ => Err(anyhow::anyhow!("Invalid sort key: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::Rank,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortSpec {
    /// Next spec after the user picks `key`: the active key flips direction,
    /// any other key starts ascending.
    pub fn toggled(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self { key, direction }
    }
}

/// Keeps assets whose price lies in `range`. An unbounded range borrows the
/// input untouched.
pub fn apply_filter<'a>(list: &'a [Asset], range: &PriceRange) -> Cow<'a, [Asset]> {
    if range.is_unbounded() {
        return Cow::Borrowed(list);
    }
    Cow::Owned(
        list.iter()
            .filter(|a| range.contains(a.current_price))
            .cloned()
            .collect(),
    )
}

/// Stable sort on a copy of `list`.
pub fn apply_sort(list: &[Asset], spec: &SortSpec) -> Vec<Asset> {
    let mut sorted = list.to_vec();
    sorted.sort_by(|a, b| {
        let ord = spec.key.value(a).total_cmp(&spec.key.value(b));
        match spec.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    sorted
}

/// Filter-then-sort view over the latest list, recomputed on every change.
#[derive(Debug, Clone, Default)]
pub struct MarketView {
    assets: Vec<Asset>,
    range: PriceRange,
    sort: SortSpec,
    visible: Vec<Asset>,
}

impl MarketView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole list; there is no incremental patching.
    pub fn replace_assets(&mut self, assets: Vec<Asset>) {
        self.assets = assets;
        self.recompute();
    }

    pub fn set_range(&mut self, range: PriceRange) {
        self.range = range;
        self.recompute();
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = self.sort.toggled(key);
        self.recompute();
    }

    fn recompute(&mut self) {
        let filtered = apply_filter(&self.assets, &self.range);
        self.visible = apply_sort(&filtered, &self.sort);
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn visible(&self) -> &[Asset] {
        &self.visible
    }

    pub fn range(&self) -> PriceRange {
        self.range
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn find(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn asset(id: &str, price: f64, rank: u32) -> Asset {
        Asset {
            id: id.to_string(),
            name: id.to_uppercase(),
            symbol: id.to_string(),
            current_price: price,
            market_cap: price * 1000.0,
            market_cap_rank: rank,
            price_change_pct_24h: 0.0,
        }
    }

    fn ids(list: &[Asset]) -> Vec<&str> {
        list.iter().map(|a| a.id.as_str()).collect()
    }

    fn sample() -> Vec<Asset> {
        vec![
            asset("btc", 50000.0, 1),
            asset("eth", 3000.0, 2),
            asset("doge", 0.08, 9),
            asset("sol", 150.0, 5),
            asset("ada", 0.45, 8),
        ]
    }

    #[test]
    fn test_unbounded_filter_is_identity_and_borrowed() {
        let list = sample();
        let out = apply_filter(&list, &PriceRange::default());
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.as_ref(), list.as_slice());
    }

    #[test]
    fn test_filter_inclusive_bounds() {
        let list = sample();
        let out = apply_filter(&list, &PriceRange::new(Some(0.45), Some(3000.0)));
        assert_eq!(ids(&out), vec!["eth", "sol", "ada"]);

        let out = apply_filter(&list, &PriceRange::new(None, Some(1.0)));
        assert_eq!(ids(&out), vec!["doge", "ada"]);

        let out = apply_filter(&list, &PriceRange::new(Some(1000.0), None));
        assert_eq!(ids(&out), vec!["btc", "eth"]);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let list = sample();
        let out = apply_filter(&list, &PriceRange::new(Some(100.0), Some(1.0)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_filter_then_sort_scenario() {
        let list = vec![asset("btc", 50000.0, 1), asset("eth", 3000.0, 2)];
        let out = apply_filter(&list, &PriceRange::new(Some(1000.0), Some(60000.0)));
        assert_eq!(ids(&out), vec!["btc", "eth"]);

        let spec = SortSpec {
            key: SortKey::Price,
            direction: SortDirection::Descending,
        };
        assert_eq!(ids(&apply_sort(&out, &spec)), vec!["btc", "eth"]);
        let spec = SortSpec {
            key: SortKey::Price,
            direction: SortDirection::Ascending,
        };
        assert_eq!(ids(&apply_sort(&out, &spec)), vec!["eth", "btc"]);
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        let mut list = sample();
        list.push(asset("ltc", 150.0, 12));
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let spec = SortSpec {
                key: SortKey::Price,
                direction,
            };
            let once = apply_sort(&list, &spec);
            assert_eq!(apply_sort(&once, &spec), once);
            let sol = once.iter().position(|a| a.id == "sol").unwrap();
            let ltc = once.iter().position(|a| a.id == "ltc").unwrap();
            assert!(sol < ltc, "equal keys keep input order");
        }
        // input untouched
        assert_eq!(list[0].id, "btc");
    }

    #[test]
    fn test_toggle_law() {
        let spec = SortSpec::default();
        let s1 = spec.toggled(SortKey::Price);
        assert_eq!(s1.direction, SortDirection::Ascending);
        let s2 = s1.toggled(SortKey::Price);
        assert_eq!(s2.direction, SortDirection::Descending);
        let s3 = s2.toggled(SortKey::Price);
        assert_eq!(s3.direction, SortDirection::Ascending);
        let s4 = s2.toggled(SortKey::MarketCap);
        assert_eq!(s4.key, SortKey::MarketCap);
        assert_eq!(s4.direction, SortDirection::Ascending);
        // default is rank ascending, so picking rank first flips it
        assert_eq!(
            SortSpec::default().toggled(SortKey::Rank).direction,
            SortDirection::Descending
        );
    }

    #[test]
    fn test_market_view_recomputes_on_every_change() {
        let mut view = MarketView::new();
        view.replace_assets(sample());
        assert_eq!(ids(view.visible()), vec!["btc", "eth", "sol", "ada", "doge"]);

        view.set_range(PricePreset::UnderOne.range());
        assert_eq!(ids(view.visible()), vec!["ada", "doge"]);

        view.sort_by(SortKey::Price);
        assert_eq!(ids(view.visible()), vec!["doge", "ada"]);

        view.replace_assets(vec![asset("xrp", 0.5, 6)]);
        assert_eq!(ids(view.visible()), vec!["xrp"]);
        assert_eq!(view.assets().len(), 1);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("price".parse::<SortKey>().unwrap(), SortKey::Price);
        assert_eq!("24h".parse::<SortKey>().unwrap(), SortKey::Change24h);
        assert!("volume".parse::<SortKey>().is_err());
    }
}
