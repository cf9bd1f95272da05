//! Flat, externally addressable triangle records.

use serde::{Deserialize, Serialize};

use crate::market::Pair;

use super::types::{RawTriangle, VertexSet};

/// Field labels of the three legs, in a/b/c order.
pub const LEG_LABELS: [&str; 3] = ["pair_a", "pair_b", "pair_c"];

/// A triangle as persisted and priced: per-leg base/quote/symbol plus the
/// comma-joined `combined` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormattedTriangle {
    /// Leg a base coin.
    pub a_base: String,
    /// Leg a quote coin.
    pub a_quote: String,
    /// Leg b base coin.
    pub b_base: String,
    /// Leg b quote coin.
    pub b_quote: String,
    /// Leg c base coin.
    pub c_base: String,
    /// Leg c quote coin.
    pub c_quote: String,
    /// Leg a symbol, `a_base_a_quote`.
    pub pair_a: String,
    /// Leg b symbol.
    pub pair_b: String,
    /// Leg c symbol.
    pub pair_c: String,
    /// `pair_a,pair_b,pair_c`.
    pub combined: String,
}

impl FormattedTriangle {
    /// `(label, symbol)` for each leg, in a/b/c order.
    pub fn legs(&self) -> [(&'static str, &str); 3] {
        [
            (LEG_LABELS[0], self.pair_a.as_str()),
            (LEG_LABELS[1], self.pair_b.as_str()),
            (LEG_LABELS[2], self.pair_c.as_str()),
        ]
    }

    /// Legs as pairs, rebuilt from the base/quote fields.
    pub fn pairs(&self) -> [Pair; 3] {
        [
            Pair::new(self.a_base.as_str(), self.a_quote.as_str()),
            Pair::new(self.b_base.as_str(), self.b_quote.as_str()),
            Pair::new(self.c_base.as_str(), self.c_quote.as_str()),
        ]
    }

    /// Re-derive the vertex set from the base/quote fields.
    ///
    /// `None` if the fields no longer describe three distinct coins.
    pub fn vertex_set(&self) -> Option<VertexSet> {
        VertexSet::from_coins([
            self.a_base.as_str(),
            self.a_quote.as_str(),
            self.b_base.as_str(),
            self.b_quote.as_str(),
            self.c_base.as_str(),
            self.c_quote.as_str(),
        ])
    }
}

impl From<&RawTriangle> for FormattedTriangle {
    fn from(triangle: &RawTriangle) -> Self {
        let [a, b, c] = triangle.legs();
        let (pair_a, pair_b, pair_c) = (a.symbol(), b.symbol(), c.symbol());
        let combined = format!("{},{},{}", pair_a, pair_b, pair_c);

        Self {
            a_base: a.base.clone(),
            a_quote: a.quote.clone(),
            b_base: b.base.clone(),
            b_quote: b.quote.clone(),
            c_base: c.base.clone(),
            c_quote: c.quote.clone(),
            pair_a,
            pair_b,
            pair_c,
            combined,
        }
    }
}

impl From<RawTriangle> for FormattedTriangle {
    fn from(triangle: RawTriangle) -> Self {
        Self::from(&triangle)
    }
}

/// Format every triangle, keeping order.
pub fn format_all(triangles: &[RawTriangle]) -> Vec<FormattedTriangle> {
    triangles.iter().map(FormattedTriangle::from).collect()
}
