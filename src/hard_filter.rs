//! Hard-filter evaluator: for an ordered pair A→B, decide whether B
//! is even a candidate for A.

use crate::catalog::QuestionCatalog;
use crate::config::MatchingConfig;
use crate::response::Respondent;
use crate::similarity::similarity;

/// Question ids used for the two built-in demographic checks. A catalog
/// that does not carry these questions simply skips the corresponding
/// check.
pub const GENDER_QUESTION_ID: &str = "interested_in_genders";
pub const GENDER_IDENTITY_QUESTION_ID: &str = "gender_identity";
pub const AGE_RANGE_QUESTION_ID: &str = "age_range_preference";
pub const AGE_QUESTION_ID: &str = "age";

const WILDCARD_ANYONE: &str = "anyone";

/// Why an ordered pair A→B failed the hard filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HardFilterViolation {
    Gender,
    AgeRange,
    Dealbreaker { question_id: String },
}

/// Evaluate the hard filter for A→B only (one direction). Short-circuits
/// on the first violation, in the order: gender, age, dealbreakers.
pub fn evaluate_one_direction(
    a: &Respondent,
    b: &Respondent,
    catalog: &QuestionCatalog,
    config: &MatchingConfig,
) -> Result<(), HardFilterViolation> {
    check_gender(a, b)?;
    check_age_range(a, b)?;
    check_dealbreakers(a, b, catalog, config)?;
    Ok(())
}

/// Both directions must pass for the pair to be a hard-filter candidate.
pub fn evaluate_pair(
    a: &Respondent,
    b: &Respondent,
    catalog: &QuestionCatalog,
    config: &MatchingConfig,
) -> Result<(), HardFilterViolation> {
    evaluate_one_direction(a, b, catalog, config)?;
    evaluate_one_direction(b, a, catalog, config)?;
    Ok(())
}

fn check_gender(a: &Respondent, b: &Respondent) -> Result<(), HardFilterViolation> {
    let Some(interested_in) = a
        .response(GENDER_QUESTION_ID)
        .and_then(|r| r.own_answer.option_set())
    else {
        return Ok(());
    };
    let Some(b_identity) = b
        .response(GENDER_IDENTITY_QUESTION_ID)
        .and_then(|r| r.own_answer.option_set())
    else {
        return Ok(());
    };

    if interested_in.contains(WILDCARD_ANYONE) {
        return Ok(());
    }
    if interested_in.is_disjoint(&b_identity) {
        return Err(HardFilterViolation::Gender);
    }
    Ok(())
}

fn check_age_range(a: &Respondent, b: &Respondent) -> Result<(), HardFilterViolation> {
    let Some((min, max)) = a
        .response(AGE_RANGE_QUESTION_ID)
        .and_then(|r| r.own_answer.as_age_range())
    else {
        return Ok(());
    };
    let Some(b_age) = b.response(AGE_QUESTION_ID).and_then(|r| r.own_answer.as_numeric()) else {
        return Ok(());
    };

    if b_age < min || b_age > max {
        return Err(HardFilterViolation::AgeRange);
    }
    Ok(())
}

fn check_dealbreakers(
    a: &Respondent,
    b: &Respondent,
    catalog: &QuestionCatalog,
    config: &MatchingConfig,
) -> Result<(), HardFilterViolation> {
    for question_id in catalog.ids_ascending() {
        let Some(question) = catalog.get(question_id) else { continue };
        let Some(a_record) = a.response(question_id) else { continue };
        if !a_record.dealbreaker {
            continue;
        }
        // Open question: "doesn't matter" dominates a dealbreaker flag — no
        // constraint applies when A's preference is absent.
        if a_record.preference.is_none() {
            continue;
        }
        let Some(b_record) = b.response(question_id) else { continue };

        let score = similarity(question, a_record, b_record, config).unwrap_or(1.0);
        if score < 1.0 {
            return Err(HardFilterViolation::Dealbreaker {
                question_id: question_id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AnswerFormat, QuestionDescriptor, ScoringMethod, Section};
    use crate::config::Importance;
    use crate::response::{Answer, Preference, PreferenceTag, ResponseRecord};
    use std::collections::{BTreeSet, HashMap};

    fn respondent(id: &str, responses: Vec<(&str, ResponseRecord)>) -> Respondent {
        Respondent {
            id: id.to_string(),
            responses: responses
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    fn plain_record(answer: Answer) -> ResponseRecord {
        ResponseRecord {
            own_answer: answer,
            preference: None,
            importance: Importance::Important,
            dealbreaker: false,
        }
    }

    #[test]
    fn gender_wildcard_anyone_passes() {
        let a = respondent(
            "a",
            vec![(
                GENDER_QUESTION_ID,
                plain_record(Answer::MultiChoice(BTreeSet::from(["anyone".to_string()]))),
            )],
        );
        let b = respondent(
            "b",
            vec![(
                GENDER_IDENTITY_QUESTION_ID,
                plain_record(Answer::MultiChoice(BTreeSet::from(["woman".to_string()]))),
            )],
        );
        assert!(check_gender(&a, &b).is_ok());
    }

    #[test]
    fn gender_mismatch_is_rejected() {
        let a = respondent(
            "a",
            vec![(
                GENDER_QUESTION_ID,
                plain_record(Answer::MultiChoice(BTreeSet::from(["man".to_string()]))),
            )],
        );
        let b = respondent(
            "b",
            vec![(
                GENDER_IDENTITY_QUESTION_ID,
                plain_record(Answer::MultiChoice(BTreeSet::from(["woman".to_string()]))),
            )],
        );
        assert_eq!(check_gender(&a, &b), Err(HardFilterViolation::Gender));
    }

    #[test]
    fn age_out_of_range_is_rejected() {
        let a = respondent(
            "a",
            vec![(
                AGE_RANGE_QUESTION_ID,
                plain_record(Answer::AgeRange { min: 25, max: 30 }),
            )],
        );
        let b = respondent("b", vec![(AGE_QUESTION_ID, plain_record(Answer::Numeric(40)))]);
        assert_eq!(check_age_range(&a, &b), Err(HardFilterViolation::AgeRange));
    }

    #[test]
    fn dealbreaker_rejects_unsatisfied_preference() {
        let mut q = QuestionDescriptor {
            id: "q8".to_string(),
            section: Section::Lifestyle,
            answer_format: AnswerFormat::SingleChoice,
            scoring_method: ScoringMethod::PreferenceMatch,
            options: vec![],
            range: None,
            ranking_length: None,
            max_selections: None,
            linked_question_id: None,
            hard_filter: false,
            required: true,
            semantic_group_map: HashMap::new(),
            flexible_tags: vec![],
        };
        q.id = "q8".to_string();
        let catalog = QuestionCatalog::new(vec![q]);
        let config = MatchingConfig::default();

        let a = respondent(
            "x",
            vec![(
                "q8",
                ResponseRecord {
                    own_answer: Answer::SingleChoice("never".to_string()),
                    preference: Some(Preference::Tag(PreferenceTag::Same)),
                    importance: Importance::VeryImportant,
                    dealbreaker: true,
                },
            )],
        );
        let b = respondent(
            "y",
            vec![("q8", plain_record(Answer::SingleChoice("frequently".to_string())))],
        );

        let result = check_dealbreakers(&a, &b, &catalog, &config);
        assert_eq!(
            result,
            Err(HardFilterViolation::Dealbreaker { question_id: "q8".to_string() })
        );
    }

    #[test]
    fn doesnt_matter_preference_suppresses_dealbreaker() {
        let q = QuestionDescriptor {
            id: "q8".to_string(),
            section: Section::Lifestyle,
            answer_format: AnswerFormat::SingleChoice,
            scoring_method: ScoringMethod::PreferenceMatch,
            options: vec![],
            range: None,
            ranking_length: None,
            max_selections: None,
            linked_question_id: None,
            hard_filter: false,
            required: true,
            semantic_group_map: HashMap::new(),
            flexible_tags: vec![],
        };
        let catalog = QuestionCatalog::new(vec![q]);
        let config = MatchingConfig::default();

        let a = respondent(
            "x",
            vec![(
                "q8",
                ResponseRecord {
                    own_answer: Answer::SingleChoice("never".to_string()),
                    preference: None,
                    importance: Importance::VeryImportant,
                    dealbreaker: true,
                },
            )],
        );
        let b = respondent(
            "y",
            vec![("q8", plain_record(Answer::SingleChoice("frequently".to_string())))],
        );

        assert!(check_dealbreakers(&a, &b, &catalog, &config).is_ok());
    }
}
