//! # Compatibility Matching Engine
//!
//! Offline batch pipeline that takes a population of questionnaire
//! respondents, a question catalog, and a matching configuration, and
//! produces disjoint one-to-one matches maximizing global pairwise
//! compatibility — together with per-pair diagnostics.
//!
//! ## Pipeline
//! - [`catalog`] — static question descriptions and scoring dispatch keys
//! - [`config`] — every numeric knob, collected under one record
//! - [`response`] — typed, validated per-respondent answers
//! - [`hard_filter`] — gender/age/dealbreaker rejection, directional
//! - [`similarity`] — per-question scoring kernel
//! - [`scorer`] — directional A→B aggregation
//! - [`combiner`] — symmetric pair score with mutuality penalty
//! - [`eligibility`] — absolute + relative threshold filtering
//! - [`blossom`] — general-graph maximum-weight matching
//! - [`matching`] — builds the weighted graph and classifies the unmatched
//! - [`diagnostics`] — counts, distributions, config snapshot
//! - [`pipeline`] — orchestrates the above behind one entry point

pub mod blossom;
pub mod catalog;
pub mod combiner;
pub mod config;
pub mod diagnostics;
pub mod eligibility;
pub mod error;
pub mod hard_filter;
pub mod matching;
pub mod pipeline;
pub mod response;
pub mod scorer;
pub mod similarity;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use catalog::{QuestionCatalog, QuestionDescriptor};
pub use config::MatchingConfig;
pub use diagnostics::Diagnostics;
pub use error::MatchingError;
pub use matching::{Match, Unmatched, UnmatchedReason};
pub use pipeline::{run_matching, validate_matching, MatchingResult, ValidationReport};
pub use response::{Answer, Respondent};
