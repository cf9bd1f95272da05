//! Collapse structurally identical triangles to one representative.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::market::Pair;

use super::types::{RawTriangle, VertexSet};

/// How a representative is chosen among triangles sharing a vertex set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum DedupStrategy {
    /// Legs re-ordered canonically; output sorted by vertex set.
    /// Independent of input pair order.
    #[default]
    Canonical,
    /// First discovered triangle wins; output in discovery order.
    FirstSeen,
}

/// Streaming accumulator of unique triangles.
///
/// Single-threaded: parallel enumeration merges into one sequence first.
#[derive(Debug, Clone)]
pub struct TriangleDeduplicator {
    strategy: DedupStrategy,
    seen: HashSet<VertexSet>,
    first_seen: Vec<RawTriangle>,
    canonical: BTreeMap<VertexSet, RawTriangle>,
}

impl TriangleDeduplicator {
    /// Create an empty deduplicator.
    pub fn new(strategy: DedupStrategy) -> Self {
        Self {
            strategy,
            seen: HashSet::new(),
            first_seen: Vec::new(),
            canonical: BTreeMap::new(),
        }
    }

    /// The strategy in use.
    pub fn strategy(&self) -> DedupStrategy {
        self.strategy
    }

    /// Offer a triangle. Returns `true` when its vertex set had not been seen.
    pub fn insert(&mut self, triangle: RawTriangle) -> bool {
        let is_new = self.seen.insert(triangle.vertices().clone());

        match self.strategy {
            DedupStrategy::FirstSeen => {
                if is_new {
                    self.first_seen.push(triangle);
                }
            }
            DedupStrategy::Canonical => {
                let candidate = canonicalize(triangle);
                let keep_existing = self
                    .canonical
                    .get(candidate.vertices())
                    .is_some_and(|kept| kept.legs() <= candidate.legs());
                if !keep_existing {
                    self.canonical.insert(candidate.vertices().clone(), candidate);
                }
            }
        }

        is_new
    }

    /// Number of unique triangles so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True when nothing has been accepted.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// The unique triangles.
    pub fn into_triangles(self) -> Vec<RawTriangle> {
        match self.strategy {
            DedupStrategy::FirstSeen => self.first_seen,
            DedupStrategy::Canonical => self.canonical.into_values().collect(),
        }
    }
}

/// Reduce `raw` to one triangle per vertex set.
pub fn deduplicate<I>(raw: I, strategy: DedupStrategy) -> Vec<RawTriangle>
where
    I: IntoIterator<Item = RawTriangle>,
{
    let mut dedup = TriangleDeduplicator::new(strategy);
    for triangle in raw {
        dedup.insert(triangle);
    }
    dedup.into_triangles()
}

/// Re-order legs so the leg joining the two smallest coins comes first,
/// then the leg joining the smallest and largest, then the remaining one.
fn canonicalize(triangle: RawTriangle) -> RawTriangle {
    triangle.sorted_by(|l, r| edge_key(l).cmp(&edge_key(r)).then_with(|| l.cmp(r)))
}

fn edge_key(pair: &Pair) -> (&str, &str) {
    if pair.base <= pair.quote {
        (pair.base.as_str(), pair.quote.as_str())
    } else {
        (pair.quote.as_str(), pair.base.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangle::enumerator::TriangleEnumerator;
    use crate::triangle::graph::PairGraph;
    use pretty_assertions::assert_eq;

    fn p(base: &str, quote: &str) -> Pair {
        Pair::new(base, quote)
    }

    fn enumerate(pairs: &[Pair]) -> Vec<RawTriangle> {
        let graph = PairGraph::new(pairs);
        TriangleEnumerator::new(&graph).enumerate()
    }

    fn market() -> Vec<Pair> {
        vec![
            p("BTC", "USDT"),
            p("ETH", "USDT"),
            p("ETH", "BTC"),
            p("SOL", "USDT"),
            p("SOL", "BTC"),
            p("XRP", "EUR"),
        ]
    }

    #[test]
    fn first_seen_keeps_discovery_order() {
        let unique = deduplicate(enumerate(&market()), DedupStrategy::FirstSeen);

        assert_eq!(unique.len(), 2);
        assert_eq!(
            unique[0].legs(),
            &[p("BTC", "USDT"), p("ETH", "USDT"), p("ETH", "BTC")]
        );
        assert_eq!(
            unique[1].legs(),
            &[p("BTC", "USDT"), p("SOL", "USDT"), p("SOL", "BTC")]
        );
    }

    #[test]
    fn canonical_orders_legs_by_smallest_coins() {
        let unique = deduplicate(enumerate(&market()), DedupStrategy::Canonical);

        assert_eq!(unique.len(), 2);
        assert_eq!(
            unique[0].legs(),
            &[p("ETH", "BTC"), p("BTC", "USDT"), p("ETH", "USDT")]
        );
        assert_eq!(
            unique[1].legs(),
            &[p("SOL", "BTC"), p("BTC", "USDT"), p("SOL", "USDT")]
        );
    }

    #[test]
    fn canonical_is_independent_of_input_order() {
        let forward = market();
        let mut backward = market();
        backward.reverse();

        let a = deduplicate(enumerate(&forward), DedupStrategy::Canonical);
        let b = deduplicate(enumerate(&backward), DedupStrategy::Canonical);
        assert_eq!(a, b);
    }

    #[test]
    fn vertex_sets_are_unique_under_both_strategies() {
        for strategy in [DedupStrategy::Canonical, DedupStrategy::FirstSeen] {
            let unique = deduplicate(enumerate(&market()), strategy);
            let sets: HashSet<_> = unique.iter().map(|t| t.vertices().clone()).collect();
            assert_eq!(sets.len(), unique.len());
        }
    }

    #[test]
    fn insert_reports_novelty() {
        let raw = enumerate(&[p("A", "B"), p("B", "C"), p("C", "A")]);
        assert_eq!(raw.len(), 6);

        let mut dedup = TriangleDeduplicator::new(DedupStrategy::FirstSeen);
        let accepted: Vec<bool> = raw.into_iter().map(|t| dedup.insert(t)).collect();
        assert_eq!(accepted, vec![true, false, false, false, false, false]);
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn strategy_parses_from_kebab_case() {
        assert_eq!("first-seen".parse::<DedupStrategy>().unwrap(), DedupStrategy::FirstSeen);
        assert_eq!("canonical".parse::<DedupStrategy>().unwrap(), DedupStrategy::Canonical);
        assert_eq!(DedupStrategy::FirstSeen.to_string(), "first-seen");
        assert!("fastest".parse::<DedupStrategy>().is_err());
    }
}
