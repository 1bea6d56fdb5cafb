use super::ui;
use crate::core::{CurrencyCode, RateStore, cross_rate, trend_for};
use crate::session::{RateSession, RefreshOutcome, SnapshotSource};
use anyhow::Result;
use comfy_table::{Attribute, Cell, Table};
use tracing::info;

pub async fn run(session: &mut RateSession<'_>, selected: Option<CurrencyCode>) -> Result<()> {
    info!("Fetching latest rates...");
    refresh_with_spinner(session).await;
    display(session, selected);
    Ok(())
}

/// Refreshes the session behind a spinner.
pub(crate) async fn refresh_with_spinner(session: &mut RateSession<'_>) {
    let pb = ui::new_spinner("Fetching exchange rates...");
    session.refresh().await;
    pb.finish_and_clear();
}

pub(crate) fn display(session: &RateSession<'_>, selected: Option<CurrencyCode>) {
    println!(
        "\n{}",
        ui::style_text("Exchange rates for 1 CNY", ui::StyleType::Title)
    );
    println!("{}", build_rates_table(session.store(), selected));
    if let Some(outcome) = session.last_refresh() {
        println!("{}", update_footer(outcome));
    }
}

pub(crate) fn build_rates_table(store: &RateStore, selected: Option<CurrencyCode>) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("1 CNY ="),
        ui::header_cell("In CNY"),
        ui::header_cell("Trend"),
    ]);

    for code in CurrencyCode::tracked() {
        let mut code_cell = Cell::new(code.to_string());
        let mut name_cell = Cell::new(code.name());
        if selected == Some(code) {
            code_cell = code_cell.add_attribute(Attribute::Bold);
            name_cell = name_cell.add_attribute(Attribute::Bold);
        }

        let rate = store.current_rate(code);
        let rate_cell = if rate > 0.0 {
            ui::rate_cell(rate)
        } else {
            ui::na_cell(false)
        };
        let inverse_cell = match cross_rate(code, CurrencyCode::BASE, store) {
            Ok(inverse) => ui::rate_cell(inverse),
            Err(_) => ui::na_cell(true),
        };

        table.add_row(vec![
            code_cell,
            name_cell,
            rate_cell,
            inverse_cell,
            ui::trend_cell(trend_for(code, store)),
        ]);
    }

    table
}

pub(crate) fn update_footer(outcome: &RefreshOutcome) -> String {
    let timestamp = outcome.updated_at.format("%Y-%m-%d %H:%M:%S");
    match outcome.source {
        SnapshotSource::Live => ui::style_text(
            &format!("Last updated: {timestamp}"),
            ui::StyleType::Subtle,
        ),
        SnapshotSource::Fallback => {
            let reason = outcome.error.as_deref().unwrap_or("unknown error");
            ui::style_text(
                &format!("Last updated: {timestamp} (fallback data, live fetch failed: {reason})"),
                ui::StyleType::Error,
            )
        }
    }
}
