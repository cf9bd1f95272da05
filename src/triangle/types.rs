//! Triangle types: vertex sets and raw (unformatted) triangles.

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

use crate::market::{Coin, Pair};

/// The unordered set of three distinct coins a triangle spans.
///
/// Stored sorted, so equality and hashing ignore discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexSet([Coin; 3]);

impl VertexSet {
    /// Build from any coins; `None` unless exactly three distinct coins appear.
    pub fn from_coins<'a, I>(coins: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut distinct: SmallVec<[&str; 6]> = SmallVec::new();
        for coin in coins {
            if !distinct.contains(&coin) {
                if distinct.len() == 3 {
                    return None;
                }
                distinct.push(coin);
            }
        }

        if distinct.len() != 3 {
            return None;
        }

        distinct.sort_unstable();
        Some(Self([
            distinct[0].to_string(),
            distinct[1].to_string(),
            distinct[2].to_string(),
        ]))
    }

    /// Coins in ascending order.
    pub fn coins(&self) -> &[Coin; 3] {
        &self.0
    }

    /// True when `coin` is one of the three vertices.
    pub fn contains(&self, coin: &str) -> bool {
        self.0.iter().any(|c| c == coin)
    }
}

impl fmt::Display for VertexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}, {}}}", self.0[0], self.0[1], self.0[2])
    }
}

/// Three pairs closing a 3-cycle, with legs in a/b/c order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawTriangle {
    legs: [Pair; 3],
    vertices: VertexSet,
}

impl RawTriangle {
    /// Build a triangle from three legs.
    ///
    /// Returns `None` unless the legs span exactly three distinct coins and
    /// every coin appears in exactly two legs.
    pub fn new(a: Pair, b: Pair, c: Pair) -> Option<Self> {
        let legs = [a, b, c];
        if !is_closed(&legs) {
            return None;
        }

        let vertices = VertexSet::from_coins(legs.iter().flat_map(|p| p.coins()))?;
        Some(Self { legs, vertices })
    }

    /// Legs in a/b/c order.
    pub fn legs(&self) -> &[Pair; 3] {
        &self.legs
    }

    /// The triangle's structural identity.
    pub fn vertices(&self) -> &VertexSet {
        &self.vertices
    }

    /// Same triangle with legs re-ordered by `compare`. The vertex set is unchanged.
    pub fn sorted_by<F>(mut self, compare: F) -> Self
    where
        F: FnMut(&Pair, &Pair) -> Ordering,
    {
        self.legs.sort_by(compare);
        self
    }

    /// Consume into legs.
    pub fn into_legs(self) -> [Pair; 3] {
        self.legs
    }
}

impl fmt::Display for RawTriangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.legs[0], self.legs[1], self.legs[2])
    }
}

/// Degree-2 regularity: each coin sits in exactly two legs and no leg is a self-loop.
fn is_closed(legs: &[Pair; 3]) -> bool {
    if legs.iter().any(|p| p.base == p.quote) {
        return false;
    }

    let mut counts: SmallVec<[(&str, u8); 6]> = SmallVec::new();
    for coin in legs.iter().flat_map(|p| p.coins()) {
        match counts.iter_mut().find(|(c, _)| *c == coin) {
            Some((_, n)) => *n += 1,
            None => counts.push((coin, 1)),
        }
    }

    counts.len() == 3 && counts.iter().all(|(_, n)| *n == 2)
}
