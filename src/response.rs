//! Respondents, their typed responses, and the raw-to-typed normalizer
//!.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{AnswerFormat, QuestionCatalog, QuestionDescriptor};
use crate::config::Importance;
use crate::error::{InvalidResponseReason, MatchingError};

/// Global permissible bounds for age-range answers. Individual questions
/// may narrow this via `QuestionDescriptor::range`, but age itself is
/// bounded here since the catalog has no per-question notion of "the
/// population's age range".
pub const AGE_RANGE_BOUNDS: (i32, i32) = (18, 99);

/// One respondent's typed, validated answer to a question.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    SingleChoice(String),
    MultiChoice(BTreeSet<String>),
    Ranking(Vec<String>),
    Likert(i32),
    Numeric(i32),
    AgeRange { min: i32, max: i32 },
    FreeText(String),
    Compound(BTreeMap<String, Answer>),
}

impl Answer {
    pub fn as_likert(&self) -> Option<i32> {
        match self {
            Self::Likert(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_numeric(&self) -> Option<i32> {
        match self {
            Self::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_age_range(&self) -> Option<(i32, i32)> {
        match self {
            Self::AgeRange { min, max } => Some((*min, *max)),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&BTreeMap<String, Answer>> {
        match self {
            Self::Compound(fields) => Some(fields),
            _ => None,
        }
    }

    /// Unifies single-choice / multi-choice / ranking answers into a set of
    /// tags, the shape `preference_match` and `multi_select_overlap` both
    /// operate on.
    pub fn option_set(&self) -> Option<BTreeSet<String>> {
        match self {
            Self::SingleChoice(tag) => Some(BTreeSet::from([tag.clone()])),
            Self::MultiChoice(tags) => Some(tags.clone()),
            Self::Ranking(tags) => Some(tags.iter().cloned().collect()),
            _ => None,
        }
    }
}

/// A preference tag drawn from the fixed set of relational stances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceTag {
    Same,
    Similar,
    Different,
    Less,
    More,
    Compatible,
    SpecificValues,
}

/// A respondent's stated preference about a partner's answer. `None`
/// (outside this type — see `ResponseRecord::preference: Option<Preference>`)
/// represents "doesn't matter" and must never be smuggled through a magic
/// tag value here.
#[derive(Debug, Clone, PartialEq)]
pub enum Preference {
    Tag(PreferenceTag),
    Range { min: i32, max: i32 },
    OptionSet(BTreeSet<String>),
    Compound(BTreeMap<String, Preference>),
}

impl Preference {
    pub fn as_tag(&self) -> Option<PreferenceTag> {
        match self {
            Self::Tag(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<(i32, i32)> {
        match self {
            Self::Range { min, max } => Some((*min, *max)),
            _ => None,
        }
    }

    pub fn as_option_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::OptionSet(set) => Some(set),
            _ => None,
        }
    }
}

/// One respondent's validated answer + preference + weighting for a single
/// question.
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub own_answer: Answer,
    pub preference: Option<Preference>,
    pub importance: Importance,
    pub dealbreaker: bool,
}

/// A respondent with fully-validated responses.
#[derive(Debug, Clone)]
pub struct Respondent {
    pub id: String,
    pub responses: HashMap<String, ResponseRecord>,
}

impl Respondent {
    pub fn response(&self, question_id: &str) -> Option<&ResponseRecord> {
        self.responses.get(question_id)
    }
}

// ============================================================================
// Raw input (the JSON shape callers hand us before normalization)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRespondent {
    pub id: String,
    pub responses: HashMap<String, RawResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResponse {
    pub own_answer: Value,
    #[serde(default)]
    pub preference: Option<Value>,
    #[serde(default)]
    pub importance: Option<String>,
    #[serde(default)]
    pub dealbreaker: bool,
}

/// Validate and canonicalize one respondent's raw responses against the
/// catalog. Unknown question ids in `raw.responses` are silently
/// ignored; a missing `required` question surfaces as
/// `InvalidResponse`.
pub fn normalize_respondent(
    raw: &RawRespondent,
    catalog: &QuestionCatalog,
) -> Result<Respondent, MatchingError> {
    let mut responses = HashMap::with_capacity(catalog.len());

    for question in catalog.iter() {
        match raw.responses.get(&question.id) {
            Some(raw_response) => {
                let record = normalize_response(question, raw_response).map_err(|reason| {
                    MatchingError::InvalidResponse {
                        respondent_id: raw.id.clone(),
                        reason,
                    }
                })?;
                responses.insert(question.id.clone(), record);
            }
            None if question.required => {
                return Err(MatchingError::InvalidResponse {
                    respondent_id: raw.id.clone(),
                    reason: InvalidResponseReason::MissingRequired {
                        question_id: question.id.clone(),
                    },
                });
            }
            None => {}
        }
    }

    Ok(Respondent {
        id: raw.id.clone(),
        responses,
    })
}

fn normalize_response(
    question: &QuestionDescriptor,
    raw: &RawResponse,
) -> Result<ResponseRecord, InvalidResponseReason> {
    let own_answer = parse_answer(question, &raw.own_answer)?;
    let preference = match &raw.preference {
        None => None,
        Some(Value::Null) => None,
        Some(value) => Some(parse_preference(question, value)?),
    };

    let importance = match &raw.importance {
        None => Importance::default(),
        Some(value) => parse_importance(value).ok_or_else(|| InvalidResponseReason::UnknownImportance {
            question_id: question.id.clone(),
            value: value.clone(),
        })?,
    };

    Ok(ResponseRecord {
        own_answer,
        preference,
        importance,
        dealbreaker: raw.dealbreaker,
    })
}

fn parse_importance(s: &str) -> Option<Importance> {
    match s {
        "NOT_IMPORTANT" => Some(Importance::NotImportant),
        "SOMEWHAT_IMPORTANT" => Some(Importance::SomewhatImportant),
        "IMPORTANT" => Some(Importance::Important),
        "VERY_IMPORTANT" => Some(Importance::VeryImportant),
        _ => None,
    }
}

fn format_mismatch(question: &QuestionDescriptor, actual: &'static str) -> InvalidResponseReason {
    InvalidResponseReason::FormatMismatch {
        question_id: question.id.clone(),
        expected: question.answer_format.name(),
        actual,
    }
}

fn check_known_tag(question: &QuestionDescriptor, tag: &str) -> Result<(), InvalidResponseReason> {
    if question.options.is_empty() || question.options.iter().any(|o| o.tag == tag) {
        Ok(())
    } else {
        Err(InvalidResponseReason::UnknownTag {
            question_id: question.id.clone(),
            tag: tag.to_string(),
        })
    }
}

fn parse_answer(question: &QuestionDescriptor, value: &Value) -> Result<Answer, InvalidResponseReason> {
    match question.answer_format {
        AnswerFormat::SingleChoice => {
            let tag = value
                .as_str()
                .ok_or_else(|| format_mismatch(question, json_kind(value)))?
                .to_string();
            check_known_tag(question, &tag)?;
            Ok(Answer::SingleChoice(tag))
        }
        AnswerFormat::MultiChoice => {
            let array = value
                .as_array()
                .ok_or_else(|| format_mismatch(question, json_kind(value)))?;
            let mut tags = BTreeSet::new();
            for item in array {
                let tag = item
                    .as_str()
                    .ok_or_else(|| format_mismatch(question, json_kind(item)))?;
                check_known_tag(question, tag)?;
                tags.insert(tag.to_string());
            }
            if let Some(max) = question.max_selections {
                if tags.len() > max {
                    return Err(InvalidResponseReason::TooManySelections {
                        question_id: question.id.clone(),
                        max,
                        actual: tags.len(),
                    });
                }
            }
            Ok(Answer::MultiChoice(tags))
        }
        AnswerFormat::Ranking => {
            let array = value
                .as_array()
                .ok_or_else(|| format_mismatch(question, json_kind(value)))?;
            let mut tags = Vec::with_capacity(array.len());
            for item in array {
                let tag = item
                    .as_str()
                    .ok_or_else(|| format_mismatch(question, json_kind(item)))?;
                check_known_tag(question, tag)?;
                tags.push(tag.to_string());
            }
            if let Some(expected) = question.ranking_length {
                if tags.len() != expected {
                    return Err(InvalidResponseReason::WrongRankingLength {
                        question_id: question.id.clone(),
                        expected,
                        actual: tags.len(),
                    });
                }
            }
            Ok(Answer::Ranking(tags))
        }
        AnswerFormat::Likert => {
            let raw_value = value
                .as_i64()
                .ok_or_else(|| format_mismatch(question, json_kind(value)))? as i32;
            let (min, max) = question.range.unwrap_or((1, 5));
            if raw_value < min || raw_value > max {
                return Err(InvalidResponseReason::OutOfBounds {
                    question_id: question.id.clone(),
                    value: raw_value,
                    min,
                    max,
                });
            }
            Ok(Answer::Likert(raw_value))
        }
        AnswerFormat::Numeric => {
            let raw_value = value
                .as_i64()
                .ok_or_else(|| format_mismatch(question, json_kind(value)))? as i32;
            if let Some((min, max)) = question.range {
                if raw_value < min || raw_value > max {
                    return Err(InvalidResponseReason::OutOfBounds {
                        question_id: question.id.clone(),
                        value: raw_value,
                        min,
                        max,
                    });
                }
            }
            Ok(Answer::Numeric(raw_value))
        }
        AnswerFormat::AgeRange => {
            let (min, max) = parse_range_object(value)
                .ok_or_else(|| format_mismatch(question, json_kind(value)))?;
            if min > max {
                return Err(InvalidResponseReason::AgeRangeInverted {
                    question_id: question.id.clone(),
                    min,
                    max,
                });
            }
            let (global_min, global_max) = AGE_RANGE_BOUNDS;
            if min < global_min || max > global_max {
                return Err(InvalidResponseReason::OutOfBounds {
                    question_id: question.id.clone(),
                    value: if min < global_min { min } else { max },
                    min: global_min,
                    max: global_max,
                });
            }
            Ok(Answer::AgeRange { min, max })
        }
        AnswerFormat::FreeText => {
            let text = value
                .as_str()
                .ok_or_else(|| format_mismatch(question, json_kind(value)))?;
            Ok(Answer::FreeText(text.to_string()))
        }
        AnswerFormat::Compound => {
            let object = value
                .as_object()
                .ok_or_else(|| format_mismatch(question, json_kind(value)))?;
            let mut fields = BTreeMap::new();
            for (key, sub_value) in object {
                fields.insert(key.clone(), parse_untyped_answer(question, sub_value)?);
            }
            Ok(Answer::Compound(fields))
        }
    }
}

/// Compound sub-answers (e.g. a love-language question's `show`/`receive`
/// fields) have no individual catalog descriptor, so they are inferred from
/// JSON shape rather than an explicit `answer_format`.
fn parse_untyped_answer(
    question: &QuestionDescriptor,
    value: &Value,
) -> Result<Answer, InvalidResponseReason> {
    match value {
        Value::String(s) => Ok(Answer::SingleChoice(s.clone())),
        Value::Number(n) => n
            .as_i64()
            .map(|v| Answer::Numeric(v as i32))
            .ok_or_else(|| format_mismatch(question, "non-integer number")),
        Value::Array(items) => {
            let mut tags = BTreeSet::new();
            for item in items {
                let tag = item
                    .as_str()
                    .ok_or_else(|| format_mismatch(question, json_kind(item)))?;
                tags.insert(tag.to_string());
            }
            Ok(Answer::MultiChoice(tags))
        }
        Value::Object(_) => {
            if let Some((min, max)) = parse_range_object(value) {
                Ok(Answer::AgeRange { min, max })
            } else {
                format_nested_compound(question, value)
            }
        }
        _ => Err(format_mismatch(question, json_kind(value))),
    }
}

fn format_nested_compound(
    question: &QuestionDescriptor,
    value: &Value,
) -> Result<Answer, InvalidResponseReason> {
    let object = value.as_object().expect("caller checked Object");
    let mut fields = BTreeMap::new();
    for (key, sub_value) in object {
        fields.insert(key.clone(), parse_untyped_answer(question, sub_value)?);
    }
    Ok(Answer::Compound(fields))
}

fn parse_range_object(value: &Value) -> Option<(i32, i32)> {
    let object = value.as_object()?;
    let min = object.get("min")?.as_i64()? as i32;
    let max = object.get("max")?.as_i64()? as i32;
    Some((min, max))
}

fn parse_preference(
    question: &QuestionDescriptor,
    value: &Value,
) -> Result<Preference, InvalidResponseReason> {
    if let Value::String(s) = value {
        if let Some(tag) = parse_preference_tag(s) {
            return Ok(Preference::Tag(tag));
        }
        // Not a recognized tag: treat as a single specific acceptable value.
        return Ok(Preference::OptionSet(BTreeSet::from([s.clone()])));
    }
    if let Some((min, max)) = parse_range_object(value) {
        return Ok(Preference::Range { min, max });
    }
    if let Value::Array(items) = value {
        let mut tags = BTreeSet::new();
        for item in items {
            let tag = item
                .as_str()
                .ok_or_else(|| format_mismatch(question, json_kind(item)))?;
            tags.insert(tag.to_string());
        }
        return Ok(Preference::OptionSet(tags));
    }
    if let Value::Object(object) = value {
        let mut fields = BTreeMap::new();
        for (key, sub_value) in object {
            fields.insert(key.clone(), parse_preference(question, sub_value)?);
        }
        return Ok(Preference::Compound(fields));
    }
    Err(format_mismatch(question, json_kind(value)))
}

fn parse_preference_tag(s: &str) -> Option<PreferenceTag> {
    match s {
        "same" => Some(PreferenceTag::Same),
        "similar" => Some(PreferenceTag::Similar),
        "different" => Some(PreferenceTag::Different),
        "less" => Some(PreferenceTag::Less),
        "more" => Some(PreferenceTag::More),
        "compatible" => Some(PreferenceTag::Compatible),
        "specific_values" => Some(PreferenceTag::SpecificValues),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{OptionSpec, ScoringMethod, Section};
    use serde_json::json;

    fn likert_question(id: &str) -> QuestionDescriptor {
        QuestionDescriptor {
            id: id.to_string(),
            section: Section::Personality,
            answer_format: AnswerFormat::Likert,
            scoring_method: ScoringMethod::Similarity,
            options: vec![],
            range: Some((1, 5)),
            ranking_length: None,
            max_selections: None,
            linked_question_id: None,
            hard_filter: false,
            required: true,
            semantic_group_map: HashMap::new(),
            flexible_tags: vec![],
        }
    }

    fn multi_question(id: &str, max_selections: Option<usize>) -> QuestionDescriptor {
        QuestionDescriptor {
            id: id.to_string(),
            section: Section::Lifestyle,
            answer_format: AnswerFormat::MultiChoice,
            scoring_method: ScoringMethod::MultiSelectOverlap,
            options: vec![
                OptionSpec { tag: "hiking".into(), has_text_input: false },
                OptionSpec { tag: "reading".into(), has_text_input: false },
                OptionSpec { tag: "gaming".into(), has_text_input: false },
            ],
            range: None,
            ranking_length: None,
            max_selections,
            linked_question_id: None,
            hard_filter: false,
            required: false,
            semantic_group_map: HashMap::new(),
            flexible_tags: vec![],
        }
    }

    #[test]
    fn normalizes_a_valid_likert_response() {
        let q = likert_question("q7");
        let raw = RawResponse {
            own_answer: json!(4),
            preference: Some(json!("similar")),
            importance: Some("VERY_IMPORTANT".to_string()),
            dealbreaker: false,
        };
        let record = normalize_response(&q, &raw).unwrap();
        assert_eq!(record.own_answer.as_likert(), Some(4));
        assert_eq!(record.importance, Importance::VeryImportant);
        assert_eq!(
            record.preference.unwrap().as_tag(),
            Some(PreferenceTag::Similar)
        );
    }

    #[test]
    fn rejects_unrecognized_importance_string() {
        let q = likert_question("q7");
        let raw = RawResponse {
            own_answer: json!(4),
            preference: None,
            importance: Some("KIND_OF_IMPORTANT".to_string()),
            dealbreaker: false,
        };
        let err = normalize_response(&q, &raw).unwrap_err();
        assert!(matches!(err, InvalidResponseReason::UnknownImportance { .. }));
    }

    #[test]
    fn missing_importance_defaults_to_important() {
        let q = likert_question("q7");
        let raw = RawResponse {
            own_answer: json!(4),
            preference: None,
            importance: None,
            dealbreaker: false,
        };
        let record = normalize_response(&q, &raw).unwrap();
        assert_eq!(record.importance, Importance::Important);
    }

    #[test]
    fn rejects_likert_out_of_range() {
        let q = likert_question("q7");
        let raw = RawResponse {
            own_answer: json!(9),
            preference: None,
            importance: None,
            dealbreaker: false,
        };
        let err = normalize_response(&q, &raw).unwrap_err();
        assert!(matches!(err, InvalidResponseReason::OutOfBounds { .. }));
    }

    #[test]
    fn rejects_multi_choice_over_max_selections() {
        let q = multi_question("q32", Some(2));
        let raw = RawResponse {
            own_answer: json!(["hiking", "reading", "gaming"]),
            preference: None,
            importance: None,
            dealbreaker: false,
        };
        let err = normalize_response(&q, &raw).unwrap_err();
        assert!(matches!(
            err,
            InvalidResponseReason::TooManySelections { .. }
        ));
    }

    #[test]
    fn rejects_unknown_tag() {
        let q = multi_question("q32", None);
        let raw = RawResponse {
            own_answer: json!(["skydiving"]),
            preference: None,
            importance: None,
            dealbreaker: false,
        };
        let err = normalize_response(&q, &raw).unwrap_err();
        assert!(matches!(err, InvalidResponseReason::UnknownTag { .. }));
    }

    #[test]
    fn missing_required_question_is_surfaced() {
        let catalog = QuestionCatalog::new(vec![likert_question("q7")]);
        let raw = RawRespondent {
            id: "alice".to_string(),
            responses: HashMap::new(),
        };
        let err = normalize_respondent(&raw, &catalog).unwrap_err();
        assert!(matches!(
            err,
            MatchingError::InvalidResponse {
                reason: InvalidResponseReason::MissingRequired { .. },
                ..
            }
        ));
    }

    #[test]
    fn missing_optional_question_is_absent_not_null() {
        let mut q = likert_question("q7");
        q.required = false;
        let catalog = QuestionCatalog::new(vec![q]);
        let raw = RawRespondent {
            id: "alice".to_string(),
            responses: HashMap::new(),
        };
        let respondent = normalize_respondent(&raw, &catalog).unwrap();
        assert!(respondent.response("q7").is_none());
    }

    #[test]
    fn unknown_question_id_in_raw_response_is_ignored() {
        let catalog = QuestionCatalog::new(vec![likert_question("q7")]);
        let mut responses = HashMap::new();
        responses.insert(
            "q7".to_string(),
            RawResponse {
                own_answer: json!(3),
                preference: None,
                importance: None,
                dealbreaker: false,
            },
        );
        responses.insert(
            "q_unknown".to_string(),
            RawResponse {
                own_answer: json!("whatever"),
                preference: None,
                importance: None,
                dealbreaker: false,
            },
        );
        let raw = RawRespondent {
            id: "alice".to_string(),
            responses,
        };
        let respondent = normalize_respondent(&raw, &catalog).unwrap();
        assert_eq!(respondent.responses.len(), 1);
    }

    #[test]
    fn compound_love_language_answer_parses_show_and_receive() {
        let q = QuestionDescriptor {
            id: "love_language".to_string(),
            section: Section::Personality,
            answer_format: AnswerFormat::Compound,
            scoring_method: ScoringMethod::BidirectionalLoveLanguage,
            options: vec![],
            range: None,
            ranking_length: None,
            max_selections: None,
            linked_question_id: None,
            hard_filter: false,
            required: false,
            semantic_group_map: HashMap::new(),
            flexible_tags: vec![],
        };
        let raw = RawResponse {
            own_answer: json!({"show": ["acts_of_service"], "receive": ["words", "gifts"]}),
            preference: None,
            importance: None,
            dealbreaker: false,
        };
        let record = normalize_response(&q, &raw).unwrap();
        let compound = record.own_answer.as_compound().unwrap();
        assert_eq!(
            compound.get("receive").unwrap().option_set().unwrap().len(),
            2
        );
    }
}
