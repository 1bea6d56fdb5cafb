use super::{rates, ui};
use crate::core::CurrencyCode;
use crate::session::RateSession;
use anyhow::{Result, bail};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::info;

/// Refreshes immediately and then every `interval`, redrawing the rates table.
///
/// Stops after `cycles` refreshes when given, otherwise on Ctrl-C.
pub async fn run(
    session: &mut RateSession<'_>,
    interval: Duration,
    cycles: Option<usize>,
    selected: Option<CurrencyCode>,
) -> Result<()> {
    run_until(session, interval, cycles, selected, tokio::signal::ctrl_c()).await
}

/// Same as [`run`], stopping as soon as `shutdown` resolves, including in the
/// middle of a refresh.
async fn run_until<S: Future>(
    session: &mut RateSession<'_>,
    interval: Duration,
    cycles: Option<usize>,
    selected: Option<CurrencyCode>,
    shutdown: S,
) -> Result<()> {
    if interval.is_zero() {
        bail!("Refresh interval must be greater than zero");
    }
    if cycles == Some(0) {
        bail!("Number of refresh cycles must be greater than zero");
    }
    info!(?interval, ?cycles, "Watching exchange rates");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut completed = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => {
                info!("Interrupted, stopping watch");
                break;
            }
        }

        if completed > 0 {
            ui::print_separator();
        }
        let pb = ui::new_spinner("Fetching exchange rates...");
        let interrupted = tokio::select! {
            _ = session.refresh() => false,
            _ = &mut shutdown => true,
        };
        pb.finish_and_clear();
        if interrupted {
            info!("Interrupted during refresh, stopping watch");
            break;
        }

        rates::display(session, selected);
        completed += 1;

        if cycles.is_some_and(|limit| completed >= limit) {
            break;
        }
        println!(
            "{}",
            ui::style_text(
                &format!("Next refresh in {}s, press Ctrl-C to stop", interval.as_secs()),
                ui::StyleType::Subtle,
            )
        );
    }

    info!(refreshes = completed, "Watch finished");
    Ok(())
}
