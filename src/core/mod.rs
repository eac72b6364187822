//! Core domain types and shared plumbing

pub mod config;
pub mod error;
pub mod log;
pub mod pair;
pub mod quote;

// Re-export main types for cleaner imports
pub use error::{ForexError, Result};
pub use pair::{CurrencyPair, SOURCE_CURRENCY, SUPPORTED_PAIRS};
pub use quote::{FetchResult, QuoteMap, QuoteProvider, RateEntry};
