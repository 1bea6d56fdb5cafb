//! Short-term trend from the two most recent rate samples

use super::currency::CurrencyCode;
use super::store::RateStore;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Up => "↗",
                Direction::Down => "↘",
                Direction::Flat => "→",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendIndicator {
    pub delta: f64,
    pub delta_percent: f64,
    pub direction: Direction,
}

pub fn trend_for(code: CurrencyCode, store: &RateStore) -> Option<TrendIndicator> {
    trend_from_history(&store.history(code))
}

/// Trend of the `from` to `to` cross rate over the two latest refreshes.
///
/// Equal to [`trend_for`] when `from` is the base currency.
pub fn cross_trend(
    from: CurrencyCode,
    to: CurrencyCode,
    store: &RateStore,
) -> Option<TrendIndicator> {
    if from == to {
        return None;
    }
    let samples = |code: CurrencyCode| {
        if code.is_base() {
            vec![1.0, 1.0]
        } else {
            store.history(code)
        }
    };
    let (from_history, to_history) = (samples(from), samples(to));
    let [.., from_prev, from_last] = from_history.as_slice() else {
        return None;
    };
    let [.., to_prev, to_last] = to_history.as_slice() else {
        return None;
    };
    if *from_prev <= 0.0 || *from_last <= 0.0 {
        return None;
    }
    trend_from_history(&[to_prev / from_prev, to_last / from_last])
}

/// Returns `None` until at least two samples exist.
pub fn trend_from_history(history: &[f64]) -> Option<TrendIndicator> {
    let [.., previous, last] = history else {
        return None;
    };
    let delta = last - previous;

    // No baseline to compare against
    if *previous == 0.0 {
        return Some(TrendIndicator {
            delta,
            delta_percent: 0.0,
            direction: Direction::Flat,
        });
    }

    let direction = if delta > 0.0 {
        Direction::Up
    } else if delta < 0.0 {
        Direction::Down
    } else {
        Direction::Flat
    };

    Some(TrendIndicator {
        delta,
        delta_percent: delta / previous * 100.0,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::RateSnapshot;

    #[test]
    fn test_no_trend_with_fewer_than_two_samples() {
        assert!(trend_from_history(&[]).is_none());
        assert!(trend_from_history(&[0.138]).is_none());

        let store = RateStore::new();
        assert!(trend_for(CurrencyCode::Usd, &store).is_none());
    }

    #[test]
    fn test_upward_trend() {
        let trend = trend_from_history(&[0.130, 0.138]).unwrap();
        assert_eq!(trend.direction, Direction::Up);
        assert!((trend.delta - 0.008).abs() < 1e-12);
        assert!((trend.delta_percent - 6.15).abs() < 0.01);
    }

    #[test]
    fn test_downward_and_flat_trend() {
        let down = trend_from_history(&[1.0, 2.0, 1.5]).unwrap();
        assert_eq!(down.direction, Direction::Down);
        assert!((down.delta_percent + 25.0).abs() < 1e-9);

        let flat = trend_from_history(&[0.2, 0.2]).unwrap();
        assert_eq!(flat.direction, Direction::Flat);
        assert_eq!(flat.delta_percent, 0.0);
    }

    #[test]
    fn test_zero_previous_sample_is_flat() {
        let trend = trend_from_history(&[0.0, 0.138]).unwrap();
        assert_eq!(trend.direction, Direction::Flat);
        assert_eq!(trend.delta_percent, 0.0);
        assert!(trend.delta_percent.is_finite());
    }

    #[test]
    fn test_trend_for_reads_store_history() {
        let mut store = RateStore::new();
        for rate in [0.130, 0.138] {
            let snapshot: RateSnapshot = [(CurrencyCode::Usd, rate)].into_iter().collect();
            store.replace_snapshot(&snapshot);
        }
        let trend = trend_for(CurrencyCode::Usd, &store).unwrap();
        assert_eq!(trend.direction, Direction::Up);
        assert!((trend.delta_percent - 6.1538).abs() < 0.001);

        // Eur was never quoted, so both samples are zero
        let eur = trend_for(CurrencyCode::Eur, &store).unwrap();
        assert_eq!(eur.direction, Direction::Flat);
    }

    fn store_with_history(samples: &[(CurrencyCode, [f64; 2])]) -> RateStore {
        let mut store = RateStore::new();
        for i in 0..2 {
            let snapshot: RateSnapshot = samples.iter().map(|(code, s)| (*code, s[i])).collect();
            store.replace_snapshot(&snapshot);
        }
        store
    }

    #[test]
    fn test_cross_trend_into_base_is_inverted() {
        let store = store_with_history(&[(CurrencyCode::Usd, [0.130, 0.138])]);

        let trend = cross_trend(CurrencyCode::Usd, CurrencyCode::Cny, &store).unwrap();
        assert_eq!(trend.direction, Direction::Down);
        // 1/0.130 = 7.6923 falling to 1/0.138 = 7.2464
        assert!((trend.delta_percent + 5.797).abs() < 0.001);
    }

    #[test]
    fn test_cross_trend_from_base_matches_quoted_trend() {
        let store = store_with_history(&[(CurrencyCode::Usd, [0.130, 0.138])]);
        assert_eq!(
            cross_trend(CurrencyCode::Cny, CurrencyCode::Usd, &store),
            trend_for(CurrencyCode::Usd, &store)
        );
    }

    #[test]
    fn test_cross_trend_between_foreign_currencies() {
        // USD weakens against CNY while JPY is unchanged, so USD buys fewer JPY
        let store = store_with_history(&[
            (CurrencyCode::Usd, [0.130, 0.138]),
            (CurrencyCode::Jpy, [20.85, 20.85]),
        ]);
        let trend = cross_trend(CurrencyCode::Usd, CurrencyCode::Jpy, &store).unwrap();
        assert_eq!(trend.direction, Direction::Down);

        let reverse = cross_trend(CurrencyCode::Jpy, CurrencyCode::Usd, &store).unwrap();
        assert_eq!(reverse.direction, Direction::Up);
    }

    #[test]
    fn test_cross_trend_without_signal() {
        let store = store_with_history(&[(CurrencyCode::Usd, [0.0, 0.138])]);
        assert!(cross_trend(CurrencyCode::Usd, CurrencyCode::Cny, &store).is_none());
        assert!(cross_trend(CurrencyCode::Usd, CurrencyCode::Usd, &store).is_none());
        assert!(cross_trend(CurrencyCode::Gbp, CurrencyCode::Usd, &RateStore::new()).is_none());
    }

    #[test]
    fn test_direction_arrows() {
        assert_eq!(Direction::Up.to_string(), "↗");
        assert_eq!(Direction::Down.to_string(), "↘");
        assert_eq!(Direction::Flat.to_string(), "→");
    }
}
