//! Raw triangle enumeration.
//!
//! Every pair is tried as a starting leg `a`. For each related pair `b`, the
//! coins appearing exactly once across `a` and `b` are the endpoints the third
//! leg must join; if such a pair exists, the triangle closes.
//!
//! A triangle on {X, Y, Z} is discovered once per starting leg and direction,
//! so each unique triangle surfaces up to six times. Deduplication is a
//! separate pass.

use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::{debug, instrument, trace};

use crate::market::Pair;

use super::graph::PairGraph;
use super::types::RawTriangle;

/// Finds every triangle reachable from each pair of a [`PairGraph`].
#[derive(Debug, Clone)]
pub struct TriangleEnumerator<'g, 'a> {
    graph: &'g PairGraph<'a>,
}

impl<'g, 'a> TriangleEnumerator<'g, 'a> {
    /// Create an enumerator over `graph`.
    pub fn new(graph: &'g PairGraph<'a>) -> Self {
        Self { graph }
    }

    /// Every raw triangle with `a` as its first leg, in discovery order.
    pub fn triangles_from(&self, a: &Pair) -> Vec<RawTriangle> {
        let mut found = Vec::new();

        for b in self.graph.related_to(a) {
            if b == a {
                continue;
            }

            let Some((x, y)) = missing_endpoints(a, b) else {
                trace!(a = %a, b = %b, "Candidate cannot close");
                continue;
            };

            let Some(c) = self.graph.edge_between(x, y) else {
                continue;
            };

            if let Some(triangle) = RawTriangle::new(a.clone(), b.clone(), c.clone()) {
                found.push(triangle);
            }
        }

        found
    }

    /// Every raw triangle from every starting pair, duplicates included.
    #[instrument(skip(self), fields(pairs = self.graph.len()))]
    pub fn enumerate(&self) -> Vec<RawTriangle> {
        let raw: Vec<RawTriangle> = self
            .graph
            .pairs()
            .iter()
            .flat_map(|a| self.triangles_from(a))
            .collect();

        debug!(raw = raw.len(), "Enumerated raw triangles");
        raw
    }

    /// Same output as [`enumerate`](Self::enumerate), with starting pairs
    /// searched in parallel.
    #[instrument(skip(self), fields(pairs = self.graph.len()))]
    pub fn enumerate_par(&self) -> Vec<RawTriangle> {
        let per_pair: Vec<Vec<RawTriangle>> = self
            .graph
            .pairs()
            .par_iter()
            .map(|a| self.triangles_from(a))
            .collect();

        let raw: Vec<RawTriangle> = per_pair.into_iter().flatten().collect();
        debug!(raw = raw.len(), "Enumerated raw triangles in parallel");
        raw
    }
}

/// The two coins that appear exactly once across the four slots of `a` and `b`.
///
/// `None` when the count is not exactly two: `b` is the same edge as `a`,
/// shares no coin with it, or one of them is a self-loop.
fn missing_endpoints<'p>(a: &'p Pair, b: &'p Pair) -> Option<(&'p str, &'p str)> {
    let mut counts: SmallVec<[(&str, u8); 4]> = SmallVec::new();
    for coin in a.coins().into_iter().chain(b.coins()) {
        match counts.iter_mut().find(|(c, _)| *c == coin) {
            Some((_, n)) => *n += 1,
            None => counts.push((coin, 1)),
        }
    }

    let mut singles = counts.iter().filter(|(_, n)| *n == 1).map(|(c, _)| *c);
    match (singles.next(), singles.next(), singles.next()) {
        (Some(x), Some(y), None) if counts.len() == 3 => Some((x, y)),
        _ => None,
    }
}
