//! Selection boundary: turning whatever a front end calls a "selected range"
//! into character offsets of one text.

use crate::core::types::{Substring, TextSide};
use crate::error::SelectionError;

/// A resolved selection. `first` and `last` are both inclusive code point
/// indices, as front ends report the first and last selected character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSelection {
    pub side: TextSide,
    pub first: usize,
    pub last: usize,
}

impl ResolvedSelection {
    pub fn new(side: TextSide, first: usize, last: usize) -> Result<Self, SelectionError> {
        if first > last {
            return Err(SelectionError::Inverted { first, last });
        }
        Ok(Self { side, first, last })
    }

    /// Half-open form used everywhere else in the crate.
    pub fn to_substring(&self) -> Substring {
        Substring::new(self.first, self.last + 1)
    }

    /// Fails unless every selected character exists in a text of `text_len`
    /// code points.
    pub fn check_bounds(&self, text_len: usize) -> Result<(), SelectionError> {
        if self.last >= text_len {
            return Err(SelectionError::OutOfBounds {
                side: self.side,
                first: self.first,
                last: self.last,
                text_len,
            });
        }
        Ok(())
    }
}

/// Capability supplied by the caller to map its own range type to offsets.
pub trait SelectionResolver {
    type Range;

    fn resolve(&self, range: &Self::Range) -> Result<ResolvedSelection, SelectionError>;
}

/// Offsets already known to the caller, e.g. a test harness or terminal UI.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectResolver;

impl SelectionResolver for DirectResolver {
    type Range = (TextSide, usize, usize);

    fn resolve(&self, range: &Self::Range) -> Result<ResolvedSelection, SelectionError> {
        let (side, first, last) = *range;
        ResolvedSelection::new(side, first, last)
    }
}

/// Selection expressed as the element ids of its first and last character
/// cell, rendered as `a-<index>` and `b-<index>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpan {
    pub start_id: Option<String>,
    pub end_id: Option<String>,
}

impl ElementSpan {
    pub fn new(start_id: impl Into<String>, end_id: impl Into<String>) -> Self {
        Self {
            start_id: Some(start_id.into()),
            end_id: Some(end_id.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ElementIdResolver;

impl ElementIdResolver {
    fn parse_id(id: Option<&str>) -> Result<(TextSide, usize), SelectionError> {
        let unresolvable = || SelectionError::Unresolvable {
            endpoint: id.unwrap_or("<none>").to_string(),
        };
        let (prefix, index) = id.and_then(|id| id.split_once('-')).ok_or_else(unresolvable)?;
        let side = match prefix {
            "a" => TextSide::A,
            "b" => TextSide::B,
            _ => return Err(unresolvable()),
        };
        let index = index.parse::<usize>().map_err(|_| unresolvable())?;
        Ok((side, index))
    }
}

impl SelectionResolver for ElementIdResolver {
    type Range = ElementSpan;

    fn resolve(&self, range: &ElementSpan) -> Result<ResolvedSelection, SelectionError> {
        let (start_side, first) = Self::parse_id(range.start_id.as_deref())?;
        let (end_side, last) = Self::parse_id(range.end_id.as_deref())?;
        if start_side != end_side {
            return Err(SelectionError::MixedSides);
        }
        ResolvedSelection::new(start_side, first, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_selection_becomes_half_open() {
        let selection = ResolvedSelection::new(TextSide::A, 2, 4).unwrap();
        assert_eq!(selection.to_substring(), Substring::new(2, 5));
    }

    #[test]
    fn inverted_selection_is_rejected() {
        assert_eq!(
            ResolvedSelection::new(TextSide::B, 5, 1),
            Err(SelectionError::Inverted { first: 5, last: 1 })
        );
    }

    #[test]
    fn bounds_check_uses_last_character() {
        let selection = ResolvedSelection::new(TextSide::A, 0, 5).unwrap();
        assert!(selection.check_bounds(6).is_ok());
        assert!(matches!(
            selection.check_bounds(5),
            Err(SelectionError::OutOfBounds { text_len: 5, .. })
        ));
    }

    #[test]
    fn element_ids_resolve() {
        let resolved = ElementIdResolver
            .resolve(&ElementSpan::new("b-12", "b-15"))
            .unwrap();
        assert_eq!(resolved, ResolvedSelection { side: TextSide::B, first: 12, last: 15 });
    }

    #[test]
    fn element_ids_across_texts_are_rejected() {
        assert_eq!(
            ElementIdResolver.resolve(&ElementSpan::new("a-1", "b-2")),
            Err(SelectionError::MixedSides)
        );
    }

    #[test]
    fn missing_or_foreign_ids_are_unresolvable() {
        let missing = ElementSpan { start_id: None, end_id: Some("a-1".into()) };
        assert!(matches!(
            ElementIdResolver.resolve(&missing),
            Err(SelectionError::Unresolvable { .. })
        ));
        assert!(matches!(
            ElementIdResolver.resolve(&ElementSpan::new("header", "a-1")),
            Err(SelectionError::Unresolvable { .. })
        ));
        assert!(matches!(
            ElementIdResolver.resolve(&ElementSpan::new("a-x", "a-1")),
            Err(SelectionError::Unresolvable { .. })
        ));
    }
}
