//! Error kinds for the matching pipeline.

use thiserror::Error;

/// Why a single respondent's raw response map failed to normalize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidResponseReason {
    #[error("question {question_id}: expected answer format {expected:?}, got {actual:?}")]
    FormatMismatch {
        question_id: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("question {question_id}: tag {tag:?} is not a member of the option set")]
    UnknownTag { question_id: String, tag: String },
    #[error("question {question_id}: ranking has length {actual}, expected {expected}")]
    WrongRankingLength {
        question_id: String,
        expected: usize,
        actual: usize,
    },
    #[error("question {question_id}: selected {actual} options, max_selections is {max}")]
    TooManySelections {
        question_id: String,
        max: usize,
        actual: usize,
    },
    #[error("question {question_id}: age range min {min} exceeds max {max}")]
    AgeRangeInverted {
        question_id: String,
        min: i32,
        max: i32,
    },
    #[error("question {question_id}: value {value} outside permissible range [{min}, {max}]")]
    OutOfBounds {
        question_id: String,
        value: i32,
        min: i32,
        max: i32,
    },
    #[error("question {question_id}: unrecognized importance level {value:?}")]
    UnknownImportance { question_id: String, value: String },
    #[error("question {question_id} is required but missing from the response map")]
    MissingRequired { question_id: String },
}

/// Top-level error type returned by every fallible entry point.
#[derive(Debug, Error)]
pub enum MatchingError {
    /// A respondent's answers failed the normalizer's checks.
    #[error("respondent {respondent_id}: invalid response ({reason})")]
    InvalidResponse {
        respondent_id: String,
        reason: InvalidResponseReason,
    },

    /// A configuration value fell outside its admissible range.
    #[error("invalid config: {field} = {value}")]
    InvalidConfig { field: &'static str, value: String },

    /// The matcher reported an internal inconsistency caught by
    /// `validate_matching`.
    #[error("matcher failed: {0}")]
    MatcherFailed(String),

    /// The matcher exceeded its wall-clock allowance.
    #[error("time budget exceeded after {elapsed_ms}ms (budget {budget_ms}ms)")]
    TimeBudgetExceeded { elapsed_ms: u128, budget_ms: u128 },

    /// A catalog or config document failed to parse as JSON.
    #[error("failed to parse catalog/config document: {0}")]
    CatalogParse(#[from] serde_json::Error),
}
