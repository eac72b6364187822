pub mod currencylayer;

pub use currencylayer::QuoteClient;
