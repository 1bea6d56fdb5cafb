use super::{rates, ui};
use crate::core::convert::{
    ConversionError, convert, cross_rate, format_amount, format_rate, parse_amount,
};
use crate::core::{CurrencyCode, RateStore, TrendIndicator, cross_trend};
use crate::session::RateSession;
use anyhow::Result;
use tracing::debug;

/// Everything the conversion card shows, computed from one store state.
struct ConversionView {
    amount_input: String,
    from: CurrencyCode,
    to: CurrencyCode,
    converted: Result<f64, ConversionError>,
    rate: Result<f64, ConversionError>,
    inverse: Result<f64, ConversionError>,
    trend: Option<TrendIndicator>,
}

pub async fn run(
    session: &mut RateSession<'_>,
    amount: &str,
    from: CurrencyCode,
    to: CurrencyCode,
) -> Result<()> {
    rates::refresh_with_spinner(session).await;

    let view = build_view(session.store(), amount, from, to);
    debug!(converted = ?view.converted, "Computed conversion");
    for line in render(&view) {
        println!("{line}");
    }
    if let Some(outcome) = session.last_refresh() {
        println!("{}", rates::update_footer(outcome));
    }
    Ok(())
}

fn build_view(store: &RateStore, amount: &str, from: CurrencyCode, to: CurrencyCode) -> ConversionView {
    ConversionView {
        amount_input: amount.trim().to_string(),
        from,
        to,
        converted: parse_amount(amount).and_then(|value| convert(value, from, to, store)),
        rate: cross_rate(from, to, store),
        inverse: cross_rate(to, from, store),
        trend: cross_trend(from, to, store),
    }
}

fn render(view: &ConversionView) -> Vec<String> {
    let mut lines = vec![format!(
        "\n{}",
        ui::style_text("Conversion", ui::StyleType::Title)
    )];

    match &view.converted {
        Ok(value) => {
            lines.push(ui::style_text(
                &format_amount(*value, view.to),
                ui::StyleType::Value,
            ));
            lines.push(format!(
                "{} {} = {} {}",
                view.amount_input,
                view.from,
                format_rate(*value),
                view.to
            ));
        }
        Err(e) => {
            lines.push(ui::style_text("N/A", ui::StyleType::Error));
            lines.push(ui::style_text(&e.to_string(), ui::StyleType::Subtle));
        }
    }

    let rate_line = match &view.rate {
        Ok(rate) => {
            let mut line = format!("1 {} = {} {}", view.from, format_rate(*rate), view.to);
            if let Some(trend) = &view.trend {
                line.push_str(&format!("  {}", ui::trend_text(trend)));
            }
            line
        }
        Err(_) => format!("1 {} = N/A {}", view.from, view.to),
    };
    lines.push(format!(
        "{} {}",
        ui::style_text("Current rate:", ui::StyleType::Label),
        rate_line
    ));

    let inverse_line = match &view.inverse {
        Ok(inverse) => format!("1 {} = {} {}", view.to, format_rate(*inverse), view.from),
        Err(_) => format!("1 {} = N/A {}", view.to, view.from),
    };
    lines.push(ui::style_text(&inverse_line, ui::StyleType::Subtle));

    lines
}
