//! Typed market records and their validation from raw API payloads.

use crate::core::error::DetailError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// One asset's market snapshot from a single list fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub market_cap_rank: u32,
    pub price_change_pct_24h: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetLinks {
    pub website: Option<String>,
    pub explorer: Option<String>,
    pub github: Option<String>,
}

/// A `(timestamp_ms, price_usd)` sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp_ms: i64,
    pub price_usd: f64,
}

/// Point handed to a chart renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

/// Price history ordered ascending by time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries(Vec<PricePoint>);

impl ChartSeries {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp_ms);
        Self(points)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn samples(&self) -> &[PricePoint] {
        &self.0
    }

    /// Lazily maps samples to renderer points.
    pub fn points(&self) -> impl Iterator<Item = ChartPoint> + '_ {
        self.0.iter().map(|p| ChartPoint {
            x: p.timestamp_ms as f64,
            y: p.price_usd,
        })
    }

    pub fn first_time(&self) -> Option<DateTime<Utc>> {
        self.0
            .first()
            .and_then(|p| DateTime::from_timestamp_millis(p.timestamp_ms))
    }

    pub fn last_time(&self) -> Option<DateTime<Utc>> {
        self.0
            .last()
            .and_then(|p| DateTime::from_timestamp_millis(p.timestamp_ms))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetDetail {
    pub asset: Asset,
    pub total_volume: f64,
    pub ath_usd: f64,
    pub atl_usd: f64,
    pub circulating_supply: f64,
    /// `None` means uncapped.
    pub max_supply: Option<f64>,
    pub description_html: String,
    pub links: AssetLinks,
    pub chart: ChartSeries,
}

impl AssetDetail {
    /// First `n` sentences of the description, or `None` when there is none.
    pub fn short_description(&self, n: usize) -> Option<String> {
        let text = self.description_html.trim();
        if text.is_empty() {
            return None;
        }
        let sentences: Vec<&str> = text.split(". ").take(n).collect();
        let joined = sentences.join(". ");
        if joined.ends_with('.') {
            Some(joined)
        } else {
            Some(format!("{joined}."))
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawMarketAsset {
    id: Option<String>,
    name: Option<String>,
    symbol: Option<String>,
    current_price: Option<f64>,
    market_cap: Option<f64>,
    market_cap_rank: Option<u32>,
    price_change_percentage_24h: Option<f64>,
}

/// Validates a `/coins/markets` payload.
///
/// Records without an id, a price, or a rank are dropped with a warning;
/// missing market cap and 24h change default to zero.
pub fn parse_market_list(value: Value) -> Result<Vec<Asset>, serde_json::Error> {
    let raw: Vec<RawMarketAsset> = serde_json::from_value(value)?;
    let assets = raw
        .into_iter()
        .filter_map(|r| {
            let (Some(id), Some(price), Some(rank)) = (r.id, r.current_price, r.market_cap_rank)
            else {
                warn!("Skipping market record with missing id, price or rank");
                return None;
            };
            Some(Asset {
                name: r.name.unwrap_or_else(|| id.clone()),
                symbol: r.symbol.unwrap_or_default(),
                id,
                current_price: price.max(0.0),
                market_cap: r.market_cap.unwrap_or(0.0).max(0.0),
                market_cap_rank: rank.max(1),
                price_change_pct_24h: r.price_change_percentage_24h.unwrap_or(0.0),
            })
        })
        .collect();
    Ok(assets)
}

#[derive(Debug, Deserialize)]
struct UsdValue {
    usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawMarketData {
    current_price: UsdValue,
    market_cap: Option<UsdValue>,
    total_volume: Option<UsdValue>,
    price_change_percentage_24h: Option<f64>,
    ath: Option<UsdValue>,
    atl: Option<UsdValue>,
    circulating_supply: Option<f64>,
    max_supply: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDescription {
    en: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRepos {
    #[serde(default)]
    github: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLinks {
    #[serde(default)]
    homepage: Vec<String>,
    #[serde(default)]
    blockchain_site: Vec<String>,
    #[serde(default)]
    repos_url: RawRepos,
}

#[derive(Debug, Deserialize)]
struct RawDetail {
    id: String,
    name: String,
    symbol: String,
    market_cap_rank: Option<u32>,
    market_data: RawMarketData,
    #[serde(default)]
    description: RawDescription,
    #[serde(default)]
    links: RawLinks,
}

fn first_link(links: &[String]) -> Option<String> {
    links.first().filter(|l| !l.trim().is_empty()).cloned()
}

fn usd(value: Option<UsdValue>) -> f64 {
    value.and_then(|v| v.usd).unwrap_or(0.0)
}

/// Builds an [`AssetDetail`] from the `/coins/{id}` and `/market_chart`
/// payloads.
pub fn assemble_detail(detail: Value, chart: Value) -> Result<AssetDetail, DetailError> {
    if detail.is_null() {
        return Err(DetailError::IncompleteData("missing detail payload".into()));
    }
    let prices = match chart.get("prices") {
        Some(p) if !p.is_null() => p.clone(),
        _ => {
            return Err(DetailError::IncompleteData(
                "chart payload has no price series".into(),
            ));
        }
    };

    let raw: RawDetail = serde_json::from_value(detail)
        .map_err(|e| DetailError::IncompleteData(format!("malformed detail payload: {e}")))?;
    let samples: Vec<(f64, f64)> = serde_json::from_value(prices)
        .map_err(|e| DetailError::IncompleteData(format!("malformed price series: {e}")))?;

    let md = raw.market_data;
    let current_price = md.current_price.usd.ok_or_else(|| {
        DetailError::IncompleteData("detail payload has no USD price".into())
    })?;

    let asset = Asset {
        id: raw.id,
        name: raw.name,
        symbol: raw.symbol,
        current_price,
        market_cap: usd(md.market_cap),
        market_cap_rank: raw.market_cap_rank.unwrap_or(0),
        price_change_pct_24h: md.price_change_percentage_24h.unwrap_or(0.0),
    };

    let chart = ChartSeries::new(
        samples
            .into_iter()
            .map(|(ts, price)| PricePoint {
                timestamp_ms: ts as i64,
                price_usd: price,
            })
            .collect(),
    );

    Ok(AssetDetail {
        asset,
        total_volume: usd(md.total_volume),
        ath_usd: usd(md.ath),
        atl_usd: usd(md.atl),
        circulating_supply: md.circulating_supply.unwrap_or(0.0),
        max_supply: md.max_supply,
        description_html: raw.description.en.unwrap_or_default(),
        links: AssetLinks {
            website: first_link(&raw.links.homepage),
            explorer: first_link(&raw.links.blockchain_site),
            github: first_link(&raw.links.repos_url.github),
        },
        chart,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub fn bitcoin_detail_json() -> Value {
        json!({
            "id": "bitcoin",
            "name": "Bitcoin",
            "symbol": "btc",
            "market_cap_rank": 1,
            "market_data": {
                "current_price": {"usd": 50000.0},
                "market_cap": {"usd": 9.5e11},
                "total_volume": {"usd": 3.2e10},
                "price_change_percentage_24h": -1.5,
                "ath": {"usd": 69000.0},
                "atl": {"usd": 67.81},
                "circulating_supply": 19500000.0,
                "max_supply": 21000000.0
            },
            "description": {"en": "Bitcoin is money. It is digital. It has blocks. It is old."},
            "links": {
                "homepage": ["https://bitcoin.org", ""],
                "blockchain_site": [""],
                "repos_url": {"github": ["https://github.com/bitcoin/bitcoin"]}
            }
        })
    }

    #[test]
    fn test_parse_market_list_drops_incomplete_records() {
        let payload = json!([
            {"id": "bitcoin", "name": "Bitcoin", "symbol": "btc", "current_price": 50000.0,
             "market_cap": 9.5e11, "market_cap_rank": 1, "price_change_percentage_24h": 2.0},
            {"id": "ghost", "name": "Ghost", "symbol": "gst", "current_price": null,
             "market_cap_rank": 99},
            {"id": "eth", "name": "Ethereum", "symbol": "eth", "current_price": 3000.0,
             "market_cap": null, "market_cap_rank": 2, "price_change_percentage_24h": null}
        ]);
        let assets = parse_market_list(payload).unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].id, "bitcoin");
        assert_eq!(assets[1].market_cap, 0.0);
        assert_eq!(assets[1].price_change_pct_24h, 0.0);
    }

    #[test]
    fn test_parse_market_list_rejects_non_array() {
        assert!(parse_market_list(json!({"error": "nope"})).is_err());
    }

    #[test]
    fn test_assemble_detail() {
        let chart = json!({"prices": [[1700000600000.0, 50100.0], [1700000000000.0, 49900.0]]});
        let detail = assemble_detail(bitcoin_detail_json(), chart).unwrap();
        assert_eq!(detail.asset.current_price, 50000.0);
        assert_eq!(detail.max_supply, Some(21000000.0));
        assert_eq!(detail.links.website.as_deref(), Some("https://bitcoin.org"));
        assert_eq!(detail.links.explorer, None);
        assert_eq!(detail.chart.len(), 2);
        let xs: Vec<f64> = detail.chart.points().map(|p| p.x).collect();
        assert!(xs[0] < xs[1], "series must be ascending by time");
        assert_eq!(
            detail.short_description(3).as_deref(),
            Some("Bitcoin is money. It is digital. It has blocks.")
        );
    }

    #[test]
    fn test_assemble_detail_requires_price_series() {
        let err = assemble_detail(bitcoin_detail_json(), json!({"prices": null})).unwrap_err();
        assert!(matches!(err, DetailError::IncompleteData(_)));
        let err = assemble_detail(bitcoin_detail_json(), json!({})).unwrap_err();
        assert!(matches!(err, DetailError::IncompleteData(_)));
        let err = assemble_detail(Value::Null, json!({"prices": []})).unwrap_err();
        assert!(matches!(err, DetailError::IncompleteData(_)));
    }
}
