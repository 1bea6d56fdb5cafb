//! Supported currencies and the rate fetching abstraction

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// One fetch cycle worth of rates, expressed per unit of the base currency.
pub type RateSnapshot = HashMap<CurrencyCode, f64>;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Ord,
    PartialOrd,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum CurrencyCode {
    Cny,
    #[default]
    Usd,
    Eur,
    Jpy,
    Gbp,
    Aud,
    Cad,
    Chf,
    Hkd,
    Krw,
    Sgd,
}

impl CurrencyCode {
    /// All stored rates are relative to this currency.
    pub const BASE: CurrencyCode = CurrencyCode::Cny;

    pub fn name(&self) -> &'static str {
        match self {
            CurrencyCode::Cny => "Chinese Yuan",
            CurrencyCode::Usd => "US Dollar",
            CurrencyCode::Eur => "Euro",
            CurrencyCode::Jpy => "Japanese Yen",
            CurrencyCode::Gbp => "British Pound",
            CurrencyCode::Aud => "Australian Dollar",
            CurrencyCode::Cad => "Canadian Dollar",
            CurrencyCode::Chf => "Swiss Franc",
            CurrencyCode::Hkd => "Hong Kong Dollar",
            CurrencyCode::Krw => "South Korean Won",
            CurrencyCode::Sgd => "Singapore Dollar",
        }
    }

    pub fn is_base(&self) -> bool {
        *self == Self::BASE
    }

    /// Catalog currencies quoted against the base, in display order.
    pub fn tracked() -> impl Iterator<Item = CurrencyCode> {
        CurrencyCode::iter().filter(|code| !code.is_base())
    }
}

// Config files accept the same spellings as the command line
impl TryFrom<String> for CurrencyCode {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[async_trait]
pub trait RateFetcher: Send + Sync {
    async fn fetch_rates(&self, base: CurrencyCode) -> Result<RateSnapshot>;
}
