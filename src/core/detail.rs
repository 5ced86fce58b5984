//! Composite detail loading: detail and chart fetched side by side.

use crate::core::asset::{AssetDetail, assemble_detail};
use crate::core::error::DetailError;
use crate::core::provider::MarketDataProvider;
use futures::future::try_join;
use tracing::{debug, instrument};

/// Fetches detail and chart concurrently and assembles them.
///
/// Fails fast on the first transport error; the other result is dropped.
#[instrument(name = "LoadDetail", skip(provider), fields(id = %id))]
pub async fn load_detail(
    provider: &dyn MarketDataProvider,
    id: &str,
) -> Result<AssetDetail, DetailError> {
    let (detail, chart) = try_join(provider.fetch_detail(id), provider.fetch_chart(id)).await?;
    debug!("Fetched detail and chart payloads");
    assemble_detail(detail, chart)
}
