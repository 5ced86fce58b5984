// Define a new module for logging initialization
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

type FilterLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// `RUST_LOG` directives take over entirely when present and valid; otherwise
/// only this crate logs, at debug when `verbose` and not at all without it.
fn filter_layer(verbose: bool, env_directives: Option<&str>) -> FilterLayer {
    if let Some(directives) = env_directives {
        match EnvFilter::try_new(directives) {
            Ok(env_filter) => return env_filter.boxed(),
            Err(e) => eprintln!("Ignoring invalid {}: {}", EnvFilter::DEFAULT_ENV, e),
        }
    }
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    Targets::new().with_target("coinwatch", level).boxed()
}

/// Installs the global subscriber. Output stays off unless `verbose` is set
/// or `RUST_LOG` asks for it.
pub fn init_logging(verbose: bool) {
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(filter_layer(verbose, env_directives.as_deref()))
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .init();
}
