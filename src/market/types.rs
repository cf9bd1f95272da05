//! Exchange-facing types: coins, tradeable pairs and quote snapshots.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::PairError;

/// A coin symbol, e.g. `"BTC"`. A vertex of the coin graph.
pub type Coin = String;

/// Delimiter between base and quote in exchange symbols.
pub const SYMBOL_DELIMITER: char = '_';

/// A tradeable market identified by an ordered (base, quote) coin tuple.
///
/// `(A, B)` and `(B, A)` are different markets but the same undirected edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pair {
    /// Base coin.
    pub base: Coin,
    /// Quote coin.
    pub quote: Coin,
}

impl Pair {
    /// Create a pair from base and quote symbols.
    pub fn new(base: impl Into<Coin>, quote: impl Into<Coin>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    /// Exchange symbol, `base_quote`.
    pub fn symbol(&self) -> String {
        format!("{}{}{}", self.base, SYMBOL_DELIMITER, self.quote)
    }

    /// True when `coin` is this pair's base or quote.
    pub fn contains(&self, coin: &str) -> bool {
        self.base == coin || self.quote == coin
    }

    /// Both coins, base first.
    pub fn coins(&self) -> [&str; 2] {
        [&self.base, &self.quote]
    }

    /// True when both pairs connect the same two coins, in either order.
    pub fn same_edge(&self, other: &Pair) -> bool {
        (self.base == other.base && self.quote == other.quote)
            || (self.base == other.quote && self.quote == other.base)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.base, SYMBOL_DELIMITER, self.quote)
    }
}

impl FromStr for Pair {
    type Err = PairError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        let (base, quote) =
            symbol
                .split_once(SYMBOL_DELIMITER)
                .ok_or_else(|| PairError::MissingDelimiter {
                    symbol: symbol.to_string(),
                })?;

        if base.is_empty() || quote.is_empty() {
            return Err(PairError::EmptyCoin {
                symbol: symbol.to_string(),
            });
        }

        Ok(Pair::new(base, quote))
    }
}

/// Parse a list of exchange symbols into pairs, failing on the first malformed one.
pub fn parse_pairs<S: AsRef<str>>(symbols: &[S]) -> Result<Vec<Pair>, PairError> {
    symbols.iter().map(|s| s.as_ref().parse()).collect()
}

/// Best bid/ask for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Exchange symbol, `base_quote`.
    pub symbol: String,
    /// Best bid price.
    pub bid: Decimal,
    /// Best ask price.
    pub ask: Decimal,
}

impl Quote {
    /// Create a quote.
    pub fn new(symbol: impl Into<String>, bid: Decimal, ask: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            bid,
            ask,
        }
    }
}

/// Point-in-time capture of quotes for every tradeable symbol.
///
/// Entries carry no ordering guarantee relative to each other.
#[derive(Debug, Clone)]
pub struct QuoteSnapshot {
    /// One quote per symbol.
    pub quotes: Vec<Quote>,
    /// When the snapshot was taken.
    pub captured_at: OffsetDateTime,
}

impl QuoteSnapshot {
    /// Wrap quotes captured now.
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            captured_at: OffsetDateTime::now_utc(),
        }
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// True when the snapshot holds no quotes.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
