//! Rate conversion and trend engine

pub mod config;
pub mod convert;
pub mod currency;
pub mod log;
pub mod store;
pub mod trend;

// Re-export main types for cleaner imports
pub use convert::{ConversionError, convert, cross_rate};
pub use currency::{CurrencyCode, RateFetcher, RateSnapshot};
pub use store::{RateStore, RefreshTicket};
pub use trend::{Direction, TrendIndicator, cross_trend, trend_for};
