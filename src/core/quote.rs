//! Quote result model and the provider abstraction

use crate::core::error::Result;
use crate::core::pair::CurrencyPair;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::warn;

/// Provider-native quotes keyed like `USDEUR`, exactly as received.
pub type QuoteMap = BTreeMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateEntry {
    pub rate: f64,
    /// Epoch seconds reported by the provider.
    pub timestamp: i64,
}

/// Outcome of a single provider fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub success: bool,
    pub terms: String,
    pub privacy: String,
    pub timestamp: i64,
    pub source: String,
    pub rates: BTreeMap<CurrencyPair, RateEntry>,
    pub all_quotes: QuoteMap,
}

/// Maps provider quotes onto the requested pairs.
///
/// Direct pairs (`USDxxx`) take the provider rate unchanged, inverse pairs
/// (`xxxUSD`) take its reciprocal. A pair whose key is missing, or an inverse
/// pair whose quote cannot be inverted, is left out of the result.
pub fn derive_rates(
    pairs: &[CurrencyPair],
    quotes: &QuoteMap,
    timestamp: i64,
) -> BTreeMap<CurrencyPair, RateEntry> {
    let mut rates = BTreeMap::new();

    for pair in pairs {
        let key = pair.quote_key();
        let Some(&quoted) = quotes.get(&key) else {
            warn!(%pair, %key, "Quote missing from provider response, skipping pair");
            continue;
        };

        let rate = if pair.is_direct() {
            quoted
        } else {
            let inverted = 1.0 / quoted;
            if quoted == 0.0 || !inverted.is_finite() {
                warn!(%pair, %key, quoted, "Quote cannot be inverted, skipping pair");
                continue;
            }
            inverted
        };

        rates.insert(pair.clone(), RateEntry { rate, timestamp });
    }

    rates
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetches live rates for `pairs`, rejecting unsupported codes up front.
    async fn fetch(&self, pairs: &[String]) -> Result<FetchResult>;

    async fn fetch_all(&self) -> Result<FetchResult>;

    fn supported_pairs(&self) -> Vec<CurrencyPair>;
}
