pub mod app;
pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::app::App;
use crate::core::config::AppConfig;
use crate::core::error::PersistenceError;
use crate::core::market::{PriceRange, SortKey};
use crate::core::portfolio::PortfolioStore;
use crate::providers::coingecko::CoinGeckoProvider;
use crate::providers::fetcher::ResilientFetcher;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// One user action against the market view or the portfolio.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Markets {
        range: PriceRange,
        sorts: Vec<SortKey>,
    },
    Detail {
        id: String,
    },
    PortfolioSet {
        id: String,
        amount: String,
    },
    PortfolioClear,
    PortfolioShow,
}

fn build_app(config: &AppConfig) -> Result<App> {
    let fetcher = ResilientFetcher::new(
        &config.provider.user_agent,
        config.provider.retry_policy(),
    )?;
    let provider = CoinGeckoProvider::new(&config.provider.base_url, fetcher);

    let portfolio = config
        .default_data_path()
        .map_err(|e| PersistenceError::Backend(format!("No data directory: {e}")))
        .and_then(|path| store::open_store(&path))
        .and_then(PortfolioStore::load);

    Ok(App::new(Arc::new(provider), portfolio))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("coinwatch starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let mut app = build_app(&config)?;

    match command {
        AppCommand::Markets { range, sorts } => cli::markets::run(&mut app, range, &sorts).await,
        AppCommand::Detail { id } => cli::detail::run(&mut app, &id).await,
        AppCommand::PortfolioSet { id, amount } => cli::portfolio::set(&mut app, &id, &amount),
        AppCommand::PortfolioClear => cli::portfolio::clear(&mut app),
        AppCommand::PortfolioShow => cli::portfolio::show(&mut app).await,
    }
}
