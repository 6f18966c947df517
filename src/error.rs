//! Error types for engine operations.

use crate::core::types::{Substring, TextSide};
use thiserror::Error;

/// Structural problems in a project, configuration or compute result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Range {}..{} on text {side} exceeds text length {text_len}", .range.start, .range.end)]
    RangeOutOfBounds {
        side: TextSide,
        range: Substring,
        text_len: usize,
    },

    #[error("Synonym link {}..{} -> {}..{} on text {side} has no reciprocal", .word.start, .word.end, .synonym.start, .synonym.end)]
    MissingReciprocal {
        side: TextSide,
        word: Substring,
        synonym: Substring,
    },

    #[error("Synonym entry {}..{} on text {side} has no synonyms", .word.start, .word.end)]
    EmptySynonymEntry { side: TextSide, word: Substring },
}

/// The external compute unit rejected its inputs or returned unusable output.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ComputationError {
    #[error("Computation rejected: {reason}")]
    Rejected { reason: String },

    #[error("Computation produced {count} matches, limit is {limit}")]
    TooManyMatches { count: usize, limit: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(ValidationError),

    #[error("Invalid computation output: {0}")]
    InvalidOutput(#[from] ValidationError),
}

/// A selected range could not be mapped to character offsets.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Selection endpoint is not a text character: {endpoint}")]
    Unresolvable { endpoint: String },

    #[error("Selection starts and ends in different texts")]
    MixedSides,

    #[error("Selection ends before it starts ({first} > {last})")]
    Inverted { first: usize, last: usize },

    #[error("Selection {first}..={last} on text {side} is outside the text (length {text_len})")]
    OutOfBounds {
        side: TextSide,
        first: usize,
        last: usize,
        text_len: usize,
    },
}

/// Both halves of a synonym link were taken from the same text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PairingError {
    #[error("Both selections are in text {side}")]
    SameText { side: TextSide },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SynonymError {
    #[error("No synonym on text {side} at {}..{}", .word.start, .word.end)]
    NotFound { side: TextSide, word: Substring },
}

/// A byte stream is not a project file.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to decompress project: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("Project is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Project content is invalid: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Failed to serialize project: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to compress project: {0}")]
    Compress(#[from] std::io::Error),
}

/// Reading or writing project files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Project file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to replace project file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Engine settings could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid settings value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Everything an engine command can fail with.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No project is loaded")]
    NoProject,

    #[error("Nothing to revert")]
    HistoryEmpty,

    #[error(transparent)]
    Computation(#[from] ComputationError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Pairing(#[from] PairingError),

    #[error(transparent)]
    Synonym(#[from] SynonymError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub type EngineResult<T> = Result<T, EngineError>;
