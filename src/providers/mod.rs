pub mod coingecko;
pub mod fetcher;
pub mod util;

pub use fetcher::{ResilientFetcher, RetryPolicy};
