//! Static description of each question: format, section, scoring method.
//!
//! The catalog is the sole authority on whether a question is hard-filter,
//! which section it belongs to, and which scoring method applies. It is
//! loaded once per run and is read-only for every later phase.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::MatchingError;

/// One of the two question groupings, weighted independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Section {
    Lifestyle,
    Personality,
}

/// The closed set of answer shapes a question can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerFormat {
    SingleChoice,
    MultiChoice,
    Ranking,
    Likert,
    Numeric,
    AgeRange,
    FreeText,
    Compound,
}

impl AnswerFormat {
    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::SingleChoice => "single_choice",
            Self::MultiChoice => "multi_choice",
            Self::Ranking => "ranking",
            Self::Likert => "likert",
            Self::Numeric => "numeric",
            Self::AgeRange => "age_range",
            Self::FreeText => "free_text",
            Self::Compound => "compound",
        }
    }
}

/// Dispatch key for the similarity kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    Similarity,
    PreferenceMatch,
    RangeOverlap,
    CompatibilityMatrix,
    BidirectionalLoveLanguage,
    MultiSelectOverlap,
    AiSentiment,
}

/// Per-option metadata: option tags and per-option flags, e.g.
/// `has_text_input`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub tag: String,
    #[serde(default)]
    pub has_text_input: bool,
}

/// Static description of one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDescriptor {
    pub id: String,
    pub section: Section,
    pub answer_format: AnswerFormat,
    pub scoring_method: ScoringMethod,

    #[serde(default)]
    pub options: Vec<OptionSpec>,

    /// Likert/numeric range, inclusive on both ends.
    #[serde(default)]
    pub range: Option<(i32, i32)>,

    /// Fixed length required for `Ranking` answers.
    #[serde(default)]
    pub ranking_length: Option<usize>,

    /// Cap on selections for `MultiChoice` answers.
    #[serde(default)]
    pub max_selections: Option<usize>,

    /// Pairs a `preference_match`-style question with a linked question
    /// (e.g. a "show love" question linked to a "receive love" question).
    #[serde(default)]
    pub linked_question_id: Option<String>,

    #[serde(default)]
    pub hard_filter: bool,

    /// Whether every respondent is expected to carry a record for this
    /// question. Missing optional questions are
    /// simply absent; a missing required question is an `InvalidResponse`.
    #[serde(default)]
    pub required: bool,

    /// Maps an option tag to a coarser semantic cluster id, e.g. religion
    /// tags to a secular/religious cluster.
    #[serde(default)]
    pub semantic_group_map: HashMap<String, String>,

    /// Tags that mean "I'm flexible, anything works" regardless of the
    /// other side's answer, e.g. a sleep-schedule question's "flexible"
    /// wildcard.
    #[serde(default)]
    pub flexible_tags: Vec<String>,
}

impl QuestionDescriptor {
    /// Semantic cluster id for `tag`, falling back to the tag itself when
    /// the catalog declares no explicit grouping.
    pub fn group_of<'a>(&'a self, tag: &'a str) -> &'a str {
        self.semantic_group_map
            .get(tag)
            .map(String::as_str)
            .unwrap_or(tag)
    }

    pub fn is_flexible(&self, tag: &str) -> bool {
        self.flexible_tags.iter().any(|t| t == tag)
    }
}

/// The full set of question descriptors for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionCatalog {
    questions: Vec<QuestionDescriptor>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<QuestionDescriptor>) -> Self {
        Self { questions }
    }

    pub fn from_json(document: &str) -> Result<Self, MatchingError> {
        Ok(serde_json::from_str(document)?)
    }

    pub fn get(&self, question_id: &str) -> Option<&QuestionDescriptor> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionDescriptor> {
        self.questions.iter()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Ascending question-id order, used everywhere summation order must be
    /// fixed for determinism.
    pub fn ids_ascending(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.questions.iter().map(|q| q.id.as_str()).collect();
        ids.sort_unstable();
        ids
    }
}
