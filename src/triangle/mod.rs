//! Triangle module: the enumeration and deduplication engine.
//!
//! This module handles:
//! - The coin graph over tradeable pairs
//! - Raw triangle enumeration from every starting pair
//! - Collapsing triangles that share a vertex set
//! - Flat formatting for persistence
//! - Joining quote snapshots onto formatted triangles

pub mod dedup;
pub mod enumerator;
pub mod format;
pub mod graph;
pub mod pricing;
pub mod types;

use std::time::Instant;

use tracing::{info, instrument};

use crate::market::Pair;
use crate::metrics;

pub use dedup::{deduplicate, DedupStrategy, TriangleDeduplicator};
pub use enumerator::TriangleEnumerator;
pub use format::{format_all, FormattedTriangle, LEG_LABELS};
pub use graph::PairGraph;
pub use pricing::{join_all, join_linear, LegQuote, PricedTriangle, QuoteIndex, TrianglePrices};
pub use types::{RawTriangle, VertexSet};

/// Options for [`structure_triangles`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureOptions {
    /// Representative selection among duplicates.
    pub strategy: DedupStrategy,
    /// Search starting pairs in parallel.
    pub parallel: bool,
}

/// Pairs in, unique formatted triangles out.
///
/// A pure function of `pairs` (and, under `FirstSeen`, of their order).
#[instrument(skip(pairs), fields(pairs = pairs.len()))]
pub fn structure_triangles(pairs: &[Pair], options: StructureOptions) -> Vec<FormattedTriangle> {
    let start = Instant::now();
    let graph = PairGraph::new(pairs);
    let enumerator = TriangleEnumerator::new(&graph);

    let raw = if options.parallel {
        enumerator.enumerate_par()
    } else {
        enumerator.enumerate()
    };
    let raw_count = raw.len();

    let unique = deduplicate(raw, options.strategy);
    let formatted = format_all(&unique);

    metrics::record_structure_latency(start);
    metrics::record_structure_counts(pairs.len(), raw_count, formatted.len());
    info!(
        coins = graph.coin_count(),
        raw = raw_count,
        unique = formatted.len(),
        strategy = %options.strategy,
        "Structured triangles"
    );

    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn p(base: &str, quote: &str) -> Pair {
        Pair::new(base, quote)
    }

    #[test]
    fn three_pairs_make_one_triangle() {
        let pairs = vec![p("BTC", "USDT"), p("ETH", "USDT"), p("BTC", "ETH")];
        let triangles = structure_triangles(&pairs, StructureOptions::default());

        assert_eq!(triangles.len(), 1);
        assert_eq!(
            triangles[0].vertex_set(),
            VertexSet::from_coins(["BTC", "ETH", "USDT"])
        );
    }

    #[test]
    fn open_path_makes_none() {
        let pairs = vec![p("BTC", "USDT"), p("ETH", "USDT")];
        assert!(structure_triangles(&pairs, StructureOptions::default()).is_empty());
        assert!(structure_triangles(&[], StructureOptions::default()).is_empty());
    }

    #[test]
    fn structuring_is_idempotent_across_options() {
        let pairs = vec![
            p("BTC", "USDT"),
            p("ETH", "USDT"),
            p("ETH", "BTC"),
            p("SOL", "USDT"),
            p("SOL", "ETH"),
            p("ADA", "BTC"),
        ];

        let sets = |options| -> HashSet<VertexSet> {
            structure_triangles(&pairs, options)
                .iter()
                .filter_map(FormattedTriangle::vertex_set)
                .collect()
        };

        let baseline = sets(StructureOptions::default());
        assert_eq!(baseline.len(), 2);
        for strategy in [DedupStrategy::Canonical, DedupStrategy::FirstSeen] {
            for parallel in [false, true] {
                assert_eq!(sets(StructureOptions { strategy, parallel }), baseline);
            }
        }
    }
}
