//! Coin graph over tradeable pairs.

use std::collections::HashMap;

use crate::market::Pair;

/// Undirected multigraph view of a pair list: coins are vertices, pairs are edges.
///
/// Pairs are indexed by coin once, so relatedness queries do not rescan the list.
#[derive(Debug, Clone)]
pub struct PairGraph<'a> {
    pairs: &'a [Pair],
    by_coin: HashMap<&'a str, Vec<usize>>,
}

impl<'a> PairGraph<'a> {
    /// Index `pairs`. Input order is kept and drives every query's output order.
    pub fn new(pairs: &'a [Pair]) -> Self {
        let mut by_coin: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (i, pair) in pairs.iter().enumerate() {
            by_coin.entry(pair.base.as_str()).or_default().push(i);
            if pair.quote != pair.base {
                by_coin.entry(pair.quote.as_str()).or_default().push(i);
            }
        }

        Self { pairs, by_coin }
    }

    /// All pairs, in input order.
    pub fn pairs(&self) -> &'a [Pair] {
        self.pairs
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when the graph has no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of distinct coins.
    pub fn coin_count(&self) -> usize {
        self.by_coin.len()
    }

    /// Every pair that touches `coin`, in input order.
    pub fn touching(&self, coin: &str) -> impl Iterator<Item = &'a Pair> + '_ {
        self.indices(coin).iter().map(move |&i| &self.pairs[i])
    }

    /// Every pair containing the base or the quote of `target`, in input order.
    ///
    /// `target` itself is included when it is in the list; excluding it is the
    /// caller's job.
    pub fn related_to(&self, target: &Pair) -> Vec<&'a Pair> {
        let left = self.indices(&target.base);
        let right = self.indices(&target.quote);

        let mut merged = Vec::with_capacity(left.len() + right.len());
        let (mut i, mut j) = (0, 0);
        while i < left.len() || j < right.len() {
            let next = match (left.get(i), right.get(j)) {
                (Some(&l), Some(&r)) if l == r => {
                    i += 1;
                    j += 1;
                    l
                }
                (Some(&l), Some(&r)) if l < r => {
                    i += 1;
                    l
                }
                (Some(_), Some(&r)) => {
                    j += 1;
                    r
                }
                (Some(&l), None) => {
                    i += 1;
                    l
                }
                (None, Some(&r)) => {
                    j += 1;
                    r
                }
                (None, None) => break,
            };
            merged.push(&self.pairs[next]);
        }

        merged
    }

    /// First pair in input order connecting `x` and `y`, in either orientation.
    pub fn edge_between(&self, x: &str, y: &str) -> Option<&'a Pair> {
        self.indices(x)
            .iter()
            .map(|&i| &self.pairs[i])
            .find(|p| p.contains(y) && p.base != p.quote)
    }

    fn indices(&self, coin: &str) -> &[usize] {
        self.by_coin.get(coin).map(Vec::as_slice).unwrap_or(&[])
    }
}
