// src/core/types.rs
use crate::core::synonyms::SynonymGraph;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two compared texts a range or index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextSide {
    A,
    B,
}

impl TextSide {
    pub fn other(self) -> Self {
        match self {
            TextSide::A => TextSide::B,
            TextSide::B => TextSide::A,
        }
    }
}

impl fmt::Display for TextSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSide::A => write!(f, "A"),
            TextSide::B => write!(f, "B"),
        }
    }
}

/// A half-open `[start, end)` range of code points in one text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Substring {
    pub start: usize,
    pub end: usize,
}

impl Substring {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// True when the range is well formed for a text of `text_len` code points.
    pub fn fits(&self, text_len: usize) -> bool {
        self.start <= self.end && self.end <= text_len
    }
}

fn held() -> bool {
    true
}

/// One externally computed correspondence between a range of text A and a
/// range of text B.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    pub a: Substring,
    pub b: Substring,
    pub similarity: f64,
    /// Strict edit-ratio match rather than a cosine correspondence.
    #[serde(alias = "levenshteinMatch")]
    pub is_exact_match: bool,
    /// Transient UI flag. Pairs start held.
    #[serde(default = "held")]
    pub hold: bool,
}

impl Pair {
    pub fn new(a: Substring, b: Substring, similarity: f64, is_exact_match: bool) -> Self {
        Self {
            a,
            b,
            similarity,
            is_exact_match,
            hold: true,
        }
    }

    pub fn side(&self, side: TextSide) -> &Substring {
        match side {
            TextSide::A => &self.a,
            TextSide::B => &self.b,
        }
    }

    pub fn similarity_class(&self) -> &'static str {
        if self.is_exact_match {
            "Edit Ratio"
        } else {
            "Cosine"
        }
    }
}

/// A user-linked word and its counterparts in the other text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymEntry {
    pub word: Substring,
    pub synonyms: Vec<Substring>,
}

/// Matching algorithm forwarded to the compute unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Algorithm {
    Matrix,
    #[default]
    Comparativus,
}

/// Parameters handed to the compute unit. Plain values only, so a clone is a
/// full snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationOptions {
    pub min_length: usize,
    pub ratio: f64,
    pub max_strikes: usize,
    pub kernel_size: usize,
    pub base_match_size: usize,
    #[serde(alias = "algorithmSelection")]
    pub algorithm: Algorithm,
    #[serde(flatten)]
    pub synonyms: SynonymGraph,
    #[serde(default)]
    pub file_name_a: Option<String>,
    #[serde(default)]
    pub file_name_b: Option<String>,
}

impl Default for ConfigurationOptions {
    fn default() -> Self {
        Self {
            min_length: 7,
            ratio: 0.8,
            max_strikes: 3,
            kernel_size: 4,
            base_match_size: 10,
            algorithm: Algorithm::default(),
            synonyms: SynonymGraph::default(),
            file_name_a: None,
            file_name_b: None,
        }
    }
}

/// The complete persisted unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectState {
    pub text_a: String,
    pub text_b: String,
    pub pairs: Vec<Pair>,
    #[serde(flatten)]
    pub config: ConfigurationOptions,
    #[serde(alias = "overallLevensteinSimilarity")]
    pub overall_similarity_a: f64,
    #[serde(alias = "overallCosineSimilarity")]
    pub overall_similarity_b: f64,
}

impl ProjectState {
    pub fn text(&self, side: TextSide) -> &str {
        match side {
            TextSide::A => &self.text_a,
            TextSide::B => &self.text_b,
        }
    }

    /// Length of a text in code points, the unit every `Substring` uses.
    pub fn text_len(&self, side: TextSide) -> usize {
        self.text(side).chars().count()
    }
}

impl ConfigurationOptions {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.ratio) {
            return Err(ValidationError::InvalidValue {
                field: "ratio",
                reason: format!("{} is outside [0, 1]", self.ratio),
            });
        }
        for (field, value) in [
            ("minLength", self.min_length),
            ("kernelSize", self.kernel_size),
            ("baseMatchSize", self.base_match_size),
        ] {
            if value == 0 {
                return Err(ValidationError::InvalidValue {
                    field,
                    reason: "must be > 0".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl ProjectState {
    /// Checks every range against its text and the synonym graph's mirror
    /// invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let len_a = self.text_len(TextSide::A);
        let len_b = self.text_len(TextSide::B);
        validate_pairs(&self.pairs, len_a, len_b)?;
        for (index, value) in [self.overall_similarity_a, self.overall_similarity_b]
            .into_iter()
            .enumerate()
        {
            if !value.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: if index == 0 { "overallSimilarityA" } else { "overallSimilarityB" },
                    reason: format!("{value} is not finite"),
                });
            }
        }
        self.config.synonyms.validate(len_a, len_b)
    }
}

pub(crate) fn validate_pairs(
    pairs: &[Pair],
    len_a: usize,
    len_b: usize,
) -> Result<(), ValidationError> {
    for (index, pair) in pairs.iter().enumerate() {
        if !pair.a.fits(len_a) {
            return Err(ValidationError::RangeOutOfBounds {
                side: TextSide::A,
                range: pair.a,
                text_len: len_a,
            });
        }
        if !pair.b.fits(len_b) {
            return Err(ValidationError::RangeOutOfBounds {
                side: TextSide::B,
                range: pair.b,
                text_len: len_b,
            });
        }
        if !pair.similarity.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: "similarity",
                reason: format!("pair {index} has similarity {}", pair.similarity),
            });
        }
    }
    Ok(())
}
