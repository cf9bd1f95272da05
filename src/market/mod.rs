//! Market module: the exchange-facing collaborator layer.
//!
//! This module handles:
//! - Coin, pair and quote types
//! - The `Fetcher` capability interface
//! - Poloniex REST fetchers for tradeable symbols and bid/ask snapshots
//! - Mock fetcher for testing

pub mod client;
pub mod fetcher;
pub mod mock;
pub mod types;

pub use client::{unroll_quotes, unroll_symbols, PoloniexClient, TickerPrices, TradeableSymbols};
pub use fetcher::Fetcher;
pub use mock::{MockConfig, MockFetcher};
pub use types::{parse_pairs, Coin, Pair, Quote, QuoteSnapshot};
