//! Attach bid/ask quotes to a triangle's legs.
//!
//! Lookups are exact symbol matches. A leg whose symbol is missing from the
//! snapshot gets no keys at all; callers must read absence as "quote
//! unavailable", never as zero.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::market::{Quote, QuoteSnapshot};

use super::format::{FormattedTriangle, LEG_LABELS};

/// Bid and ask for one leg. Both or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegQuote {
    /// Best bid.
    pub bid: Decimal,
    /// Best ask.
    pub ask: Decimal,
}

impl From<&Quote> for LegQuote {
    fn from(quote: &Quote) -> Self {
        Self {
            bid: quote.bid,
            ask: quote.ask,
        }
    }
}

/// Resolved quotes for the three legs of one triangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrianglePrices {
    /// Leg a.
    pub pair_a: Option<LegQuote>,
    /// Leg b.
    pub pair_b: Option<LegQuote>,
    /// Leg c.
    pub pair_c: Option<LegQuote>,
}

impl TrianglePrices {
    /// True when all three legs were found.
    pub fn is_complete(&self) -> bool {
        self.pair_a.is_some() && self.pair_b.is_some() && self.pair_c.is_some()
    }

    /// Legs in a/b/c order.
    pub fn legs(&self) -> [Option<LegQuote>; 3] {
        [self.pair_a, self.pair_b, self.pair_c]
    }

    /// Flat `{leg}_ask` / `{leg}_bid` map containing only the legs that were found.
    pub fn to_keyed(&self) -> BTreeMap<String, Decimal> {
        let mut keyed = BTreeMap::new();
        for (label, leg) in LEG_LABELS.iter().zip(self.legs()) {
            if let Some(quote) = leg {
                keyed.insert(format!("{label}_ask"), quote.ask);
                keyed.insert(format!("{label}_bid"), quote.bid);
            }
        }
        keyed
    }
}

/// A formatted triangle plus whatever `{leg}_ask` / `{leg}_bid` keys resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedTriangle {
    /// The triangle's fields.
    #[serde(flatten)]
    pub triangle: FormattedTriangle,
    /// Resolved price keys.
    #[serde(flatten)]
    pub prices: BTreeMap<String, Decimal>,
}

/// Quote snapshot indexed by symbol for O(1) leg lookups.
#[derive(Debug, Clone)]
pub struct QuoteIndex<'s> {
    by_symbol: HashMap<&'s str, &'s Quote>,
}

impl<'s> QuoteIndex<'s> {
    /// Index `snapshot`. On duplicate symbols the later entry wins.
    pub fn new(snapshot: &'s QuoteSnapshot) -> Self {
        let by_symbol = snapshot
            .quotes
            .iter()
            .map(|q| (q.symbol.as_str(), q))
            .collect();
        Self { by_symbol }
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    /// True when no symbols are indexed.
    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    /// Quote for one symbol.
    pub fn get(&self, symbol: &str) -> Option<&'s Quote> {
        self.by_symbol.get(symbol).copied()
    }

    /// Resolve all three legs of `triangle`.
    pub fn join(&self, triangle: &FormattedTriangle) -> TrianglePrices {
        let lookup = |symbol: &str| self.get(symbol).map(LegQuote::from);
        TrianglePrices {
            pair_a: lookup(triangle.pair_a.as_str()),
            pair_b: lookup(triangle.pair_b.as_str()),
            pair_c: lookup(triangle.pair_c.as_str()),
        }
    }

    /// Resolve and attach the flat price keys to a copy of `triangle`.
    pub fn price(&self, triangle: &FormattedTriangle) -> PricedTriangle {
        PricedTriangle {
            triangle: triangle.clone(),
            prices: self.join(triangle).to_keyed(),
        }
    }
}

/// Linear-scan join against an unindexed snapshot. Agrees with [`QuoteIndex::join`].
pub fn join_linear(triangle: &FormattedTriangle, snapshot: &QuoteSnapshot) -> TrianglePrices {
    let lookup = |symbol: &str| {
        snapshot
            .quotes
            .iter()
            .rev()
            .find(|q| q.symbol == symbol)
            .map(LegQuote::from)
    };

    TrianglePrices {
        pair_a: lookup(triangle.pair_a.as_str()),
        pair_b: lookup(triangle.pair_b.as_str()),
        pair_c: lookup(triangle.pair_c.as_str()),
    }
}

/// Price every triangle against one snapshot. Output order follows `triangles`.
#[instrument(skip_all, fields(triangles = triangles.len(), quotes = snapshot.len()))]
pub fn join_all(triangles: &[FormattedTriangle], snapshot: &QuoteSnapshot) -> Vec<PricedTriangle> {
    let index = QuoteIndex::new(snapshot);
    let priced: Vec<PricedTriangle> = triangles.par_iter().map(|t| index.price(t)).collect();

    let complete = priced.iter().filter(|p| p.prices.len() == 6).count();
    debug!(complete, incomplete = priced.len() - complete, "Joined quotes");
    priced
}
