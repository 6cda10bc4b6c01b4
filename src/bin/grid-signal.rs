// Grid Signal CLI
// Evaluate configured bots against prices from the command line or a file

use clap::{Parser, Subcommand};
use tracing::{error, info};
use grid_signal_engine::{logging, Config, TradingResult};

#[path = "../cli/signal_commands.rs"]
mod signal_commands;

#[derive(Parser)]
#[command(name = "grid-signal")]
#[command(version)]
#[command(about = "Trading bot signal engine", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "bots.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Load and validate the configuration
    Validate,

    /// Print the levels of a grid
    Levels {
        #[arg(long)]
        lower: f64,

        #[arg(long)]
        upper: f64,

        /// Number of grid lines
        #[arg(long, default_value = "5")]
        grids: usize,
    },

    /// Evaluate every active grid bot at one price
    Evaluate {
        #[arg(short, long, allow_hyphen_values = true)]
        price: f64,

        /// Only bots trading this symbol
        #[arg(short, long)]
        symbol: Option<String>,
    },

    /// Feed a file of prices through the evaluation loop
    Replay {
        /// One tick per line: PRICE, SYMBOL PRICE or SYMBOL,PRICE
        #[arg(short, long)]
        prices: String,

        /// Symbol for lines that carry only a price
        #[arg(short, long)]
        symbol: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logging switches come from the config when it is readable
    let logging_config = Config::from_file(&cli.config)
        .map(|config| config.logging)
        .unwrap_or_default();
    logging::init(cli.verbose, &logging_config);

    info!("🚀 Grid Signal v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli).await {
        error!("❌ {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> TradingResult<()> {
    match cli.command {
        // Init and levels don't need a config file
        Commands::Init { force } => signal_commands::init_config(&cli.config, force),
        Commands::Levels { lower, upper, grids } => signal_commands::show_levels(lower, upper, grids),

        Commands::Validate => {
            let config = Config::from_file(&cli.config)?;
            signal_commands::validate_config(&config)
        }
        Commands::Evaluate { price, symbol } => {
            let config = Config::from_file(&cli.config)?;
            signal_commands::evaluate_price(&config, price, symbol.as_deref())
        }
        Commands::Replay { prices, symbol } => {
            let config = Config::from_file(&cli.config)?;
            signal_commands::replay_prices(&config, &prices, symbol.as_deref()).await
        }
    }
}
