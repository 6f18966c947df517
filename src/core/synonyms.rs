// src/core/synonyms.rs
use crate::core::types::{Substring, SynonymEntry, TextSide};
use crate::error::{PairingError, SynonymError, ValidationError};
use crate::selection::ResolvedSelection;
use serde::{Deserialize, Serialize};

/// The user-curated links between word ranges of text A and text B.
///
/// `synonyms_a` and `synonyms_b` mirror each other: every link `(a, b)` kept
/// under `synonyms_a` is also kept as `(b, a)` under `synonyms_b`. Both are
/// only ever changed together through [`SynonymGraph::link`] and
/// [`SynonymGraph::unlink`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SynonymGraph {
    #[serde(rename = "synonymsA", default)]
    synonyms_a: Vec<SynonymEntry>,
    #[serde(rename = "synonymsB", default)]
    synonyms_b: Vec<SynonymEntry>,
}

impl SynonymGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, side: TextSide) -> &[SynonymEntry] {
        match side {
            TextSide::A => &self.synonyms_a,
            TextSide::B => &self.synonyms_b,
        }
    }

    fn entries_mut(&mut self, side: TextSide) -> &mut Vec<SynonymEntry> {
        match side {
            TextSide::A => &mut self.synonyms_a,
            TextSide::B => &mut self.synonyms_b,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms_a.is_empty() && self.synonyms_b.is_empty()
    }

    /// Links `word_a` in text A with `word_b` in text B, recording both
    /// directions. Repeated links append duplicates.
    pub fn link(&mut self, word_a: Substring, word_b: Substring) {
        Self::upsert(&mut self.synonyms_a, word_a, word_b);
        Self::upsert(&mut self.synonyms_b, word_b, word_a);
    }

    fn upsert(entries: &mut Vec<SynonymEntry>, word: Substring, synonym: Substring) {
        match entries.iter_mut().find(|entry| entry.word == word) {
            Some(entry) => entry.synonyms.push(synonym),
            None => entries.push(SynonymEntry {
                word,
                synonyms: vec![synonym],
            }),
        }
    }

    /// Removes the entry for `word` on `side` along with every reciprocal
    /// reference to it. Entries left without synonyms are dropped.
    pub fn unlink(&mut self, side: TextSide, word: Substring) -> Result<SynonymEntry, SynonymError> {
        let entries = self.entries_mut(side);
        let position = entries
            .iter()
            .position(|entry| entry.word == word)
            .ok_or(SynonymError::NotFound { side, word })?;
        let removed = entries.remove(position);

        let others = self.entries_mut(side.other());
        for entry in others.iter_mut() {
            entry.synonyms.retain(|synonym| *synonym != word);
        }
        others.retain(|entry| !entry.synonyms.is_empty());
        Ok(removed)
    }

    /// Checks ranges against text lengths, the mirror invariant and that no
    /// entry is empty.
    pub fn validate(&self, len_a: usize, len_b: usize) -> Result<(), ValidationError> {
        for side in [TextSide::A, TextSide::B] {
            let (own_len, other_len) = match side {
                TextSide::A => (len_a, len_b),
                TextSide::B => (len_b, len_a),
            };
            for entry in self.entries(side) {
                if !entry.word.fits(own_len) {
                    return Err(ValidationError::RangeOutOfBounds {
                        side,
                        range: entry.word,
                        text_len: own_len,
                    });
                }
                if entry.synonyms.is_empty() {
                    return Err(ValidationError::EmptySynonymEntry {
                        side,
                        word: entry.word,
                    });
                }
                for synonym in &entry.synonyms {
                    if !synonym.fits(other_len) {
                        return Err(ValidationError::RangeOutOfBounds {
                            side: side.other(),
                            range: *synonym,
                            text_len: other_len,
                        });
                    }
                    if !self.has_link(side.other(), *synonym, entry.word) {
                        return Err(ValidationError::MissingReciprocal {
                            side,
                            word: entry.word,
                            synonym: *synonym,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn has_link(&self, side: TextSide, word: Substring, synonym: Substring) -> bool {
        self.entries(side)
            .iter()
            .any(|entry| entry.word == word && entry.synonyms.contains(&synonym))
    }
}

/// Outcome of feeding one selection into [`SynonymSelector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStep {
    /// First word captured; the caller should ask for the second one.
    AwaitingSecond,
    /// Both words known, ordered as (text A word, text B word).
    Completed { word_a: Substring, word_b: Substring },
}

/// Two-step selection state machine used to build a synonym link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SynonymSelector {
    #[default]
    Idle,
    AwaitingSecond(ResolvedSelection),
}

impl SynonymSelector {
    pub fn is_idle(&self) -> bool {
        matches!(self, SynonymSelector::Idle)
    }

    pub fn pending(&self) -> Option<&ResolvedSelection> {
        match self {
            SynonymSelector::Idle => None,
            SynonymSelector::AwaitingSecond(pending) => Some(pending),
        }
    }

    /// Captures the first selection, or completes the link with the second.
    /// A second selection from the same text is refused and the pending one
    /// is kept so the caller can retry.
    pub fn begin_or_complete(
        &mut self,
        selection: ResolvedSelection,
    ) -> Result<SelectionStep, PairingError> {
        let pending = match self {
            SynonymSelector::Idle => {
                *self = SynonymSelector::AwaitingSecond(selection);
                return Ok(SelectionStep::AwaitingSecond);
            }
            SynonymSelector::AwaitingSecond(pending) => *pending,
        };
        if pending.side == selection.side {
            return Err(PairingError::SameText { side: selection.side });
        }
        let (first_a, first_b) = match pending.side {
            TextSide::A => (pending, selection),
            TextSide::B => (selection, pending),
        };
        *self = SynonymSelector::Idle;
        Ok(SelectionStep::Completed {
            word_a: first_a.to_substring(),
            word_b: first_b.to_substring(),
        })
    }

    pub fn reset(&mut self) {
        *self = SynonymSelector::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn s(start: usize, end: usize) -> Substring {
        Substring::new(start, end)
    }

    fn sel(side: TextSide, first: usize, last: usize) -> ResolvedSelection {
        ResolvedSelection { side, first, last }
    }

    #[test]
    fn link_records_both_directions() {
        let mut graph = SynonymGraph::new();
        graph.link(s(0, 1), s(4, 5));
        assert_eq!(
            graph.entries(TextSide::A),
            &[SynonymEntry { word: s(0, 1), synonyms: vec![s(4, 5)] }]
        );
        assert_eq!(
            graph.entries(TextSide::B),
            &[SynonymEntry { word: s(4, 5), synonyms: vec![s(0, 1)] }]
        );
    }

    #[test]
    fn link_appends_to_existing_word_and_tolerates_duplicates() {
        let mut graph = SynonymGraph::new();
        graph.link(s(0, 2), s(3, 5));
        graph.link(s(0, 2), s(7, 9));
        graph.link(s(0, 2), s(3, 5));
        assert_eq!(graph.entries(TextSide::A).len(), 1);
        assert_eq!(
            graph.entries(TextSide::A)[0].synonyms,
            vec![s(3, 5), s(7, 9), s(3, 5)]
        );
        assert_eq!(graph.entries(TextSide::B).len(), 2);
        assert!(graph.validate(10, 10).is_ok());
    }

    #[test]
    fn unlink_drops_reciprocals_and_empty_entries() {
        let mut graph = SynonymGraph::new();
        graph.link(s(0, 2), s(3, 5));
        graph.link(s(6, 8), s(3, 5));
        graph.link(s(0, 2), s(9, 10));

        let removed = graph.unlink(TextSide::A, s(0, 2)).unwrap();
        assert_eq!(removed.synonyms, vec![s(3, 5), s(9, 10)]);
        assert_eq!(
            graph.entries(TextSide::B),
            &[SynonymEntry { word: s(3, 5), synonyms: vec![s(6, 8)] }]
        );
        assert!(graph.validate(10, 10).is_ok());
    }

    #[test]
    fn unlink_from_text_b() {
        let mut graph = SynonymGraph::new();
        graph.link(s(0, 1), s(4, 5));
        graph.unlink(TextSide::B, s(4, 5)).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn unlink_unknown_word_leaves_graph_untouched() {
        let mut graph = SynonymGraph::new();
        graph.link(s(0, 1), s(4, 5));
        let before = graph.clone();
        let err = graph.unlink(TextSide::A, s(0, 2)).unwrap_err();
        assert_eq!(err, SynonymError::NotFound { side: TextSide::A, word: s(0, 2) });
        assert_eq!(graph, before);
    }

    #[test]
    fn validate_detects_missing_reciprocal() {
        let graph = SynonymGraph {
            synonyms_a: vec![SynonymEntry { word: s(0, 1), synonyms: vec![s(2, 3)] }],
            synonyms_b: vec![],
        };
        assert!(matches!(
            graph.validate(5, 5),
            Err(ValidationError::MissingReciprocal { side: TextSide::A, .. })
        ));
    }

    #[test]
    fn selector_walks_through_states() {
        let mut selector = SynonymSelector::default();
        assert_eq!(
            selector.begin_or_complete(sel(TextSide::A, 0, 0)),
            Ok(SelectionStep::AwaitingSecond)
        );
        assert_eq!(selector.pending(), Some(&sel(TextSide::A, 0, 0)));
        assert_eq!(
            selector.begin_or_complete(sel(TextSide::B, 4, 4)),
            Ok(SelectionStep::Completed { word_a: s(0, 1), word_b: s(4, 5) })
        );
        assert!(selector.is_idle());
    }

    #[test]
    fn selector_orders_words_when_b_comes_first() {
        let mut selector = SynonymSelector::default();
        selector.begin_or_complete(sel(TextSide::B, 2, 3)).unwrap();
        assert_eq!(
            selector.begin_or_complete(sel(TextSide::A, 7, 9)),
            Ok(SelectionStep::Completed { word_a: s(7, 10), word_b: s(2, 4) })
        );
    }

    #[test]
    fn selector_rejects_same_text_and_keeps_waiting() {
        let mut selector = SynonymSelector::default();
        selector.begin_or_complete(sel(TextSide::A, 0, 1)).unwrap();
        assert_eq!(
            selector.begin_or_complete(sel(TextSide::A, 3, 4)),
            Err(PairingError::SameText { side: TextSide::A })
        );
        assert_eq!(selector.pending(), Some(&sel(TextSide::A, 0, 1)));
        assert!(matches!(
            selector.begin_or_complete(sel(TextSide::B, 0, 0)),
            Ok(SelectionStep::Completed { .. })
        ));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Link(Substring, Substring),
        Unlink(TextSide, Substring),
    }

    fn small_range() -> impl Strategy<Value = Substring> {
        (0usize..6).prop_map(|start| Substring::new(start, start + 1))
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (small_range(), small_range()).prop_map(|(a, b)| Op::Link(a, b)),
            (prop_oneof![Just(TextSide::A), Just(TextSide::B)], small_range())
                .prop_map(|(side, word)| Op::Unlink(side, word)),
        ]
    }

    proptest! {
        /// Any sequence of links and unlinks keeps the two collections as
        /// mirror images with no empty entries.
        #[test]
        fn prop_graph_stays_bidirectional(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let mut graph = SynonymGraph::new();
            for op in ops {
                match op {
                    Op::Link(a, b) => graph.link(a, b),
                    Op::Unlink(side, word) => {
                        let _ = graph.unlink(side, word);
                    }
                }
            }
            prop_assert!(graph.validate(7, 7).is_ok(), "{:?}", graph);
        }
    }
}
