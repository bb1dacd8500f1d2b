//! Per-question similarity kernel: for one question, how well B's
//! answer satisfies A's preference. Pure and deterministic — the only
//! inputs are the question descriptor, the two records, and config.

use std::collections::BTreeSet;

use crate::catalog::{QuestionDescriptor, ScoringMethod};
use crate::config::MatchingConfig;
use crate::response::{Answer, Preference, PreferenceTag, ResponseRecord};

/// `similarity(q, A, B)` — how well B's answer satisfies A's preference.
/// `None` means the question is excluded from scoring entirely (only
/// `ai_sentiment`, which the core does not implement); every other method
/// always yields `Some(x)` with `x` in `[0, 1]`.
///
/// Callers are responsible for the "B has no answer for this question"
/// edge case: that is a property of the *pair*, not of the two
/// records in isolation, so it is handled one level up in the directional
/// scorer rather than here.
pub fn similarity(
    question: &QuestionDescriptor,
    a: &ResponseRecord,
    b: &ResponseRecord,
    config: &MatchingConfig,
) -> Option<f64> {
    if question.scoring_method == ScoringMethod::AiSentiment {
        return None;
    }

    let Some(preference) = &a.preference else {
        return Some(1.0);
    };

    if question.scoring_method != ScoringMethod::PreferenceMatch && is_flexible_answer(question, b)
    {
        return Some(1.0);
    }

    let score = match question.scoring_method {
        ScoringMethod::Similarity => likert_similarity(question, a, b, preference),
        ScoringMethod::PreferenceMatch => preference_match(question, a, b, preference, config),
        ScoringMethod::RangeOverlap => range_overlap(b, preference),
        ScoringMethod::MultiSelectOverlap => multi_select_overlap(a, b, preference),
        ScoringMethod::CompatibilityMatrix => compatibility_matrix(a, b, config),
        ScoringMethod::BidirectionalLoveLanguage => bidirectional_love_language(a, b, config),
        ScoringMethod::AiSentiment => unreachable!("handled above"),
    };

    Some(score.clamp(0.0, 1.0))
}

fn is_flexible_answer(question: &QuestionDescriptor, record: &ResponseRecord) -> bool {
    match record.own_answer.option_set() {
        Some(tags) => tags.iter().any(|t| question.is_flexible(t)),
        None => false,
    }
}

fn likert_similarity(
    question: &QuestionDescriptor,
    a: &ResponseRecord,
    b: &ResponseRecord,
    preference: &Preference,
) -> f64 {
    let (Some(a_value), Some(b_value)) = (
        a.own_answer.as_likert().or_else(|| a.own_answer.as_numeric()),
        b.own_answer.as_likert().or_else(|| b.own_answer.as_numeric()),
    ) else {
        return 0.0;
    };

    let (min, max) = question.range.unwrap_or((1, 5));
    let r = (max - min) as f64;
    if r <= 0.0 {
        return if a_value == b_value { 1.0 } else { 0.0 };
    }

    let d = (a_value - b_value).unsigned_abs() as f64;
    match preference.as_tag() {
        Some(PreferenceTag::Same) => {
            if d == 0.0 {
                1.0
            } else {
                0.0
            }
        }
        Some(PreferenceTag::Similar) | None => (1.0 - d / r).max(0.0),
        Some(PreferenceTag::Different) => (d / r).min(1.0),
        Some(PreferenceTag::More) => (((b_value - a_value) as f64) / r + 0.5).clamp(0.0, 1.0),
        Some(PreferenceTag::Less) => (((a_value - b_value) as f64) / r + 0.5).clamp(0.0, 1.0),
        Some(PreferenceTag::Compatible) | Some(PreferenceTag::SpecificValues) => {
            (1.0 - d / r).max(0.0)
        }
    }
}

fn shares_group(question: &QuestionDescriptor, set: &BTreeSet<String>, group: &str) -> bool {
    set.iter().any(|tag| question.group_of(tag) == group)
}

fn preference_match(
    question: &QuestionDescriptor,
    a: &ResponseRecord,
    b: &ResponseRecord,
    preference: &Preference,
    config: &MatchingConfig,
) -> f64 {
    let s_a = a.own_answer.option_set().unwrap_or_default();
    let s_b = b.own_answer.option_set().unwrap_or_default();

    let acceptable: BTreeSet<String> = match preference {
        Preference::OptionSet(set) => set.clone(),
        _ => s_a.clone(),
    };

    let raw = if acceptable == s_b {
        1.0
    } else {
        match preference.as_tag() {
            Some(PreferenceTag::Same) => {
                if acceptable.is_subset(&s_b) {
                    let extras_share_group = s_b
                        .difference(&acceptable)
                        .all(|tag| acceptable.iter().any(|a_tag| question.group_of(a_tag) == question.group_of(tag)));
                    if extras_share_group {
                        0.9
                    } else {
                        0.7
                    }
                } else {
                    0.0
                }
            }
            Some(PreferenceTag::Similar) | None => {
                if !acceptable.is_disjoint(&s_b) {
                    1.0
                } else if acceptable
                    .iter()
                    .any(|tag| shares_group(question, &s_b, question.group_of(tag)))
                {
                    0.7
                } else {
                    0.0
                }
            }
            _ => {
                if !acceptable.is_disjoint(&s_b) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    };

    let bonus = if is_flexible_answer(question, b) || is_flexible_answer(question, a) {
        config.sleep_flexibility_bonus
    } else {
        0.0
    };

    (raw + bonus).min(1.0)
}

fn range_overlap(b: &ResponseRecord, preference: &Preference) -> f64 {
    let Some((lo, hi)) = preference.as_range() else {
        return 0.0;
    };
    let Some(v) = b.own_answer.as_numeric().or_else(|| b.own_answer.as_likert()) else {
        return 0.0;
    };

    if v >= lo && v <= hi {
        return 1.0;
    }

    let width = (hi - lo) as f64;
    let half = (width / 2.0).max(1.0);
    let distance = if v < lo { (lo - v) as f64 } else { (v - hi) as f64 };
    (1.0 - distance / half).max(0.0)
}

fn multi_select_overlap(a: &ResponseRecord, b: &ResponseRecord, preference: &Preference) -> f64 {
    let s_a = a.own_answer.option_set().unwrap_or_default();
    let s_b = b.own_answer.option_set().unwrap_or_default();

    match preference.as_tag() {
        Some(PreferenceTag::Same) => {
            if s_a == s_b {
                1.0
            } else {
                0.0
            }
        }
        _ => {
            if s_a.is_empty() || s_b.is_empty() {
                return 0.0;
            }
            let overlap = s_a.intersection(&s_b).count() as f64;
            let sat_a = overlap / s_b.len() as f64;
            let sat_b = overlap / s_a.len() as f64;
            (sat_a + sat_b) / 2.0
        }
    }
}

fn compatibility_matrix(a: &ResponseRecord, b: &ResponseRecord, config: &MatchingConfig) -> f64 {
    let (Answer::SingleChoice(a_tag), Answer::SingleChoice(b_tag)) =
        (&a.own_answer, &b.own_answer)
    else {
        return 0.0;
    };
    config.compatibility(a_tag, b_tag).unwrap_or(0.0)
}

fn bidirectional_love_language(a: &ResponseRecord, b: &ResponseRecord, config: &MatchingConfig) -> f64 {
    let empty = BTreeSet::new();
    let a_receive = compound_set(a, "receive").unwrap_or(&empty);
    let b_show = compound_set(b, "show").unwrap_or(&empty);
    let b_receive = compound_set(b, "receive").unwrap_or(&empty);
    let a_show = compound_set(a, "show").unwrap_or(&empty);

    let o1 = if a_receive.is_empty() || b_show.is_empty() {
        1.0
    } else {
        a_receive.intersection(b_show).count() as f64 / a_receive.len() as f64
    };
    let o2 = if b_receive.is_empty() || a_show.is_empty() {
        1.0
    } else {
        b_receive.intersection(a_show).count() as f64 / b_receive.len() as f64
    };

    config.love_language_weights.show * o2 + config.love_language_weights.receive * o1
}

fn compound_set<'a>(record: &'a ResponseRecord, field: &str) -> Option<&'a BTreeSet<String>> {
    record
        .own_answer
        .as_compound()?
        .get(field)
        .and_then(|answer| match answer {
            Answer::MultiChoice(set) => Some(set),
            _ => None,
        })
}
