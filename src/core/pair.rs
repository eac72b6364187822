//! Currency pair codes and the supported pair set

use crate::core::error::{ForexError, Result};
use std::fmt::Display;
use std::str::FromStr;

/// Base currency of every quote the provider returns.
pub const SOURCE_CURRENCY: &str = "USD";

/// Pairs the client accepts; each has USD on one side.
pub const SUPPORTED_PAIRS: [&str; 8] = [
    "EURUSD", "GBPUSD", "USDJPY", "AUDUSD", "USDCHF", "NZDUSD", "USDCAD", "USDZAR",
];

/// A 6-letter code made of a 3-letter base and a 3-letter quote currency, e.g. `EURUSD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct CurrencyPair(String);

impl CurrencyPair {
    /// Parses a pair code, upper-casing it first. Only the shape is checked here;
    /// membership in the supported set is checked by the client.
    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim().to_ascii_uppercase();
        if code.len() != 6 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ForexError::UnsupportedPair(vec![code]));
        }
        Ok(CurrencyPair(code))
    }

    pub fn supported() -> Vec<CurrencyPair> {
        SUPPORTED_PAIRS
            .iter()
            .map(|code| CurrencyPair((*code).to_string()))
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn base(&self) -> &str {
        &self.0[..3]
    }

    pub fn quote(&self) -> &str {
        &self.0[3..]
    }

    /// True when USD is the base currency, so the provider rate is used as is.
    pub fn is_direct(&self) -> bool {
        self.base() == SOURCE_CURRENCY
    }

    /// Provider key holding the rate for this pair: always `USD` + the non-USD side.
    pub fn quote_key(&self) -> String {
        if self.is_direct() {
            format!("{SOURCE_CURRENCY}{}", self.quote())
        } else {
            format!("{SOURCE_CURRENCY}{}", self.base())
        }
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CurrencyPair {
    type Err = ForexError;

    fn from_str(s: &str) -> Result<Self> {
        CurrencyPair::parse(s)
    }
}

impl AsRef<str> for CurrencyPair {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
