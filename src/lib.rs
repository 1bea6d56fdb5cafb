pub mod cli;
pub mod core;
pub mod providers;
pub mod session;

use crate::core::config::AppConfig;
use crate::core::{CurrencyCode, RateFetcher};
use crate::providers::{ErApiProvider, FallbackProvider};
use crate::session::RateSession;
use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    Rates {
        select: Option<CurrencyCode>,
    },
    Convert {
        amount: String,
        from: CurrencyCode,
        to: Option<CurrencyCode>,
    },
    Watch {
        interval_secs: Option<u64>,
        cycles: Option<usize>,
    },
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    offline: bool,
) -> Result<()> {
    info!("cnyrate starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let live_provider = ErApiProvider::new(&config.er_api());
    let fetcher: &dyn RateFetcher = if offline {
        info!("Offline mode, using fallback rates");
        &FallbackProvider
    } else {
        &live_provider
    };
    let mut session = RateSession::new(fetcher);

    match command {
        AppCommand::Rates { select } => {
            cli::rates::run(&mut session, Some(select.unwrap_or(config.target))).await
        }
        AppCommand::Convert { amount, from, to } => {
            let to = to.unwrap_or(config.target);
            cli::convert::run(&mut session, &amount, from, to).await
        }
        AppCommand::Watch {
            interval_secs,
            cycles,
        } => {
            let interval =
                Duration::from_secs(interval_secs.unwrap_or(config.refresh_interval_secs));
            cli::watch::run(&mut session, interval, cycles, Some(config.target)).await
        }
    }
}
