//! Boundary to the external similarity computation.

use crate::core::types::{validate_pairs, ConfigurationOptions, Pair};
use crate::error::ComputationError;

/// The matcher stops after this many exact matches.
pub const MAX_MATCHES: usize = 20_000;

/// Everything one computation produces. Always replaced as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputeOutput {
    pub pairs: Vec<Pair>,
    pub overall_similarity_a: f64,
    pub overall_similarity_b: f64,
}

impl ComputeOutput {
    /// Rejects results the engine cannot render: too many matches, ranges
    /// outside the texts, or non-finite scores.
    pub fn check(&self, len_a: usize, len_b: usize) -> Result<(), ComputationError> {
        let matches = self.pairs.iter().filter(|pair| pair.is_exact_match).count();
        if matches > MAX_MATCHES {
            return Err(ComputationError::TooManyMatches {
                count: matches,
                limit: MAX_MATCHES,
            });
        }
        validate_pairs(&self.pairs, len_a, len_b)?;
        if !self.overall_similarity_a.is_finite() || !self.overall_similarity_b.is_finite() {
            return Err(ComputationError::Rejected {
                reason: "overall similarity is not finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Capability supplied by the host: match two texts under a configuration.
pub trait Compute {
    fn compute(
        &self,
        text_a: &str,
        text_b: &str,
        config: &ConfigurationOptions,
    ) -> Result<ComputeOutput, ComputationError>;
}

impl<F> Compute for F
where
    F: Fn(&str, &str, &ConfigurationOptions) -> Result<ComputeOutput, ComputationError>,
{
    fn compute(
        &self,
        text_a: &str,
        text_b: &str,
        config: &ConfigurationOptions,
    ) -> Result<ComputeOutput, ComputationError> {
        self(text_a, text_b, config)
    }
}

/// Answers every request with a fixed result.
///
/// Lets a project restored from disk be explored and edited when the real
/// matcher is not available.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    output: ComputeOutput,
}

impl Replay {
    pub fn new(output: ComputeOutput) -> Self {
        Self { output }
    }

    pub fn empty() -> Self {
        Self::new(ComputeOutput {
            pairs: Vec::new(),
            overall_similarity_a: 0.0,
            overall_similarity_b: 0.0,
        })
    }
}

impl Compute for Replay {
    fn compute(
        &self,
        _text_a: &str,
        _text_b: &str,
        _config: &ConfigurationOptions,
    ) -> Result<ComputeOutput, ComputationError> {
        let mut output = self.output.clone();
        for pair in &mut output.pairs {
            pair.hold = true;
        }
        Ok(output)
    }
}

const PUNCTUATION: [char; 43] = [
    '.', ',', '，', '。', '：', '；', '「', '」', '？', '\n', '、', '·', '》', '《', '“', '”', '‘',
    '’', '！', '（', '）', '【', '】', '『', '』', '—', '～', '\r', '\t', ' ', '*', '!', '?', ':',
    ';', '(', ')', '[', ']', '{', '}', '<', '>',
];

/// Strips punctuation and whitespace before texts are handed to the matcher.
pub fn clean_text(text: &str) -> String {
    text.chars().filter(|c| !PUNCTUATION.contains(c)).collect()
}
