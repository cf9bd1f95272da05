//! Triangular arbitrage surface scanner.
//!
//! Given the tradeable pairs of an exchange, this library finds every set of
//! three pairs that closes a cycle over three distinct coins, keeps one
//! triangle per coin set, and attaches point-in-time bid/ask quotes to each
//! triangle's legs for downstream profitability evaluation.
//!
//! # Pipeline
//!
//! ```text
//! symbols ──parse──▶ pairs ──▶ PairGraph ──▶ enumerate ──▶ deduplicate ──▶ format
//!                                                                           │
//!                                                                       persist
//!                                                                           │
//!                            quote snapshot ──────────────────────────▶ join prices
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`market`]: Pair/quote types and exchange fetchers
//! - [`triangle`]: Enumeration, deduplication, formatting and price joining
//! - [`store`]: Triangle set persistence
//! - [`metrics`]: Prometheus metrics

pub mod config;
pub mod error;
pub mod market;
pub mod metrics;
pub mod store;
pub mod triangle;

pub use config::Config;
pub use error::{Result, TriArbError};
