//! Core business logic abstractions

pub mod asset;
pub mod config;
pub mod detail;
pub mod error;
pub mod format;
pub mod log;
pub mod market;
pub mod portfolio;
pub mod provider;
pub mod store;

// Re-export main types for cleaner imports
pub use asset::{Asset, AssetDetail, ChartPoint};
pub use error::{DetailError, FetchError, PersistenceError};
pub use market::{MarketView, PricePreset, PriceRange, SortDirection, SortKey, SortSpec};
pub use portfolio::PortfolioStore;
pub use provider::MarketDataProvider;
