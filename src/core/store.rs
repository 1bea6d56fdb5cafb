//! In-memory rate store with a bounded rolling history per currency

use super::currency::{CurrencyCode, RateSnapshot};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, warn};

/// Maximum number of samples kept per currency.
pub const HISTORY_CAPACITY: usize = 10;

/// Sequence number handed out before a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Debug, Default)]
pub struct RateStore {
    rates: HashMap<CurrencyCode, f64>,
    history: HashMap<CurrencyCode, VecDeque<f64>>,
    issued: u64,
    applied: u64,
}

impl RateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites current rates and appends one sample per tracked currency.
    ///
    /// Currencies missing from `new_rates` keep their previous rate (or 0),
    /// and that retained value is what gets appended.
    pub fn replace_snapshot(&mut self, new_rates: &RateSnapshot) {
        for code in CurrencyCode::tracked() {
            let rate = match new_rates.get(&code) {
                Some(rate) => sanitize(code, Some(*rate)),
                None => self.current_rate(code),
            };
            self.rates.insert(code, rate);

            let samples = self.history.entry(code).or_default();
            samples.push_back(rate);
            while samples.len() > HISTORY_CAPACITY {
                samples.pop_front();
            }
        }
        debug!(currencies = new_rates.len(), "Replaced rate snapshot");
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Applies `new_rates` only when `ticket` is the latest one issued.
    pub fn replace_snapshot_if_latest(
        &mut self,
        ticket: RefreshTicket,
        new_rates: &RateSnapshot,
    ) -> bool {
        if ticket.0 != self.issued || ticket.0 <= self.applied {
            debug!(
                ticket = ticket.0,
                latest = self.issued,
                "Discarding stale rate snapshot"
            );
            return false;
        }
        self.applied = ticket.0;
        self.replace_snapshot(new_rates);
        true
    }

    pub fn current_rate(&self, code: CurrencyCode) -> f64 {
        if code.is_base() {
            return 1.0;
        }
        self.rates.get(&code).copied().unwrap_or(0.0)
    }

    /// Recorded samples, oldest first.
    pub fn history(&self, code: CurrencyCode) -> Vec<f64> {
        self.history
            .get(&code)
            .map(|samples| samples.iter().copied().collect())
            .unwrap_or_default()
    }
}

fn sanitize(code: CurrencyCode, rate: Option<f64>) -> f64 {
    match rate {
        Some(rate) if rate.is_finite() && rate >= 0.0 => rate,
        Some(rate) => {
            warn!(%code, rate, "Ignoring invalid rate, storing 0");
            0.0
        }
        None => 0.0,
    }
}
