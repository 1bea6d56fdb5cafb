use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use cnyrate::core::CurrencyCode;
use cnyrate::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Skip the network and use the built-in fallback rates
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display CNY rates for all supported currencies
    Rates {
        /// Currency to highlight
        #[arg(short, long)]
        select: Option<CurrencyCode>,
    },
    /// Convert an amount between currencies
    Convert {
        /// Amount to convert
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Source currency
        #[arg(short, long, default_value = "CNY")]
        from: CurrencyCode,
        /// Target currency, defaults to the configured one
        #[arg(short, long)]
        to: Option<CurrencyCode>,
    },
    /// Refresh rates periodically
    Watch {
        /// Seconds between refreshes
        #[arg(short, long)]
        interval: Option<u64>,
        /// Stop after this many refreshes
        #[arg(short = 'n', long)]
        cycles: Option<usize>,
    },
}

impl From<Commands> for cnyrate::AppCommand {
    fn from(cmd: Commands) -> cnyrate::AppCommand {
        match cmd {
            Commands::Rates { select } => cnyrate::AppCommand::Rates { select },
            Commands::Convert { amount, from, to } => {
                cnyrate::AppCommand::Convert { amount, from, to }
            }
            Commands::Watch { interval, cycles } => cnyrate::AppCommand::Watch {
                interval_secs: interval,
                cycles,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let result = match cli.command {
        Some(Commands::Setup) => cnyrate::cli::setup::setup(),
        Some(cmd) => {
            cnyrate::run_command(cmd.into(), cli.config_path.as_deref(), cli.offline).await
        }
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
