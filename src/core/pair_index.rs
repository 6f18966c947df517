// src/core/pair_index.rs
use crate::core::types::{Pair, TextSide};

/// Read-only lookup over the pairs of one computation.
///
/// Overlapping pairs are common: a secondary pass or a synonym may nest
/// inside a larger primary match. The most specific one governs a character.
#[derive(Debug, Clone, Copy)]
pub struct PairIndex<'a> {
    pairs: &'a [Pair],
}

impl<'a> PairIndex<'a> {
    pub fn new(pairs: &'a [Pair]) -> Self {
        Self { pairs }
    }

    /// Position of the pair governing `index` on `side`.
    /// Smallest span wins; on equal spans the earliest pair wins.
    /// O(n) in the number of pairs.
    pub fn position(&self, index: usize, side: TextSide) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (position, pair) in self.pairs.iter().enumerate() {
            let range = pair.side(side);
            if !range.contains(index) {
                continue;
            }
            let span = range.len();
            match best {
                Some((_, best_span)) if span >= best_span => {}
                _ => best = Some((position, span)),
            }
        }
        best.map(|(position, _)| position)
    }

    pub fn containing_pair(&self, index: usize, side: TextSide) -> Option<&'a Pair> {
        self.position(index, side).map(|position| &self.pairs[position])
    }
}
