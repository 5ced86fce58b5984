use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use coinwatch::core::log::init_logging;
use coinwatch::core::market::{PricePreset, PriceRange, SortKey};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    #[value(name = "under-1")]
    UnderOne,
    #[value(name = "1-10")]
    OneToTen,
    #[value(name = "10-100")]
    TenToHundred,
    #[value(name = "100-1k")]
    HundredToThousand,
    #[value(name = "over-1k")]
    OverThousand,
}

impl From<Preset> for PricePreset {
    fn from(p: Preset) -> Self {
        match p {
            Preset::UnderOne => PricePreset::UnderOne,
            Preset::OneToTen => PricePreset::OneToTen,
            Preset::TenToHundred => PricePreset::TenToHundred,
            Preset::HundredToThousand => PricePreset::HundredToThousand,
            Preset::OverThousand => PricePreset::OverThousand,
        }
    }
}

#[derive(Args)]
struct MarketsArgs {
    /// Minimum price in USD
    #[arg(long, conflicts_with = "preset")]
    min: Option<f64>,

    /// Maximum price in USD
    #[arg(long, conflicts_with = "preset")]
    max: Option<f64>,

    /// Quick price band
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Sort column (rank, price, change, cap); repeat a column to flip direction
    #[arg(short, long)]
    sort: Vec<SortKey>,
}

#[derive(Subcommand)]
enum PortfolioCommands {
    /// Set the held amount of an asset
    Set { id: String, amount: String },
    /// Remove all holdings
    Clear,
    /// Show holdings valued at current prices
    Show,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the market table
    Markets(MarketsArgs),
    /// Display detail and 7-day chart for one asset
    Detail { id: String },
    /// Manage portfolio holdings
    #[command(subcommand)]
    Portfolio(PortfolioCommands),
}

impl From<Commands> for coinwatch::AppCommand {
    fn from(cmd: Commands) -> coinwatch::AppCommand {
        match cmd {
            Commands::Markets(args) => {
                let range = match args.preset {
                    Some(p) => PricePreset::from(p).range(),
                    None => PriceRange::new(args.min, args.max),
                };
                coinwatch::AppCommand::Markets {
                    range,
                    sorts: args.sort,
                }
            }
            Commands::Detail { id } => coinwatch::AppCommand::Detail { id },
            Commands::Portfolio(PortfolioCommands::Set { id, amount }) => {
                coinwatch::AppCommand::PortfolioSet { id, amount }
            }
            Commands::Portfolio(PortfolioCommands::Clear) => coinwatch::AppCommand::PortfolioClear,
            Commands::Portfolio(PortfolioCommands::Show) => coinwatch::AppCommand::PortfolioShow,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => coinwatch::cli::setup::setup(),
        Some(cmd) => coinwatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
