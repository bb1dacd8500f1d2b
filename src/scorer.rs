//! Directional scorer: combine per-question similarities into a
//! single A→B score in `[0, 100]`.

use std::collections::HashMap;

use crate::catalog::{QuestionCatalog, Section};
use crate::config::MatchingConfig;
use crate::response::Respondent;
use crate::similarity::similarity;

/// `s_{AB}` — how well B satisfies A, in `[0, 100]`.
///
/// Iterates the catalog in ascending question-id order so floating point
/// summation is reproducible across runs.
pub fn directional_score(
    a: &Respondent,
    b: &Respondent,
    catalog: &QuestionCatalog,
    config: &MatchingConfig,
) -> f64 {
    let mut section_weighted_sum: HashMap<Section, f64> = HashMap::new();
    let mut section_weight_total: HashMap<Section, f64> = HashMap::new();
    let mut section_unweighted_sum: HashMap<Section, f64> = HashMap::new();
    let mut section_count: HashMap<Section, usize> = HashMap::new();

    for question_id in catalog.ids_ascending() {
        let Some(question) = catalog.get(question_id) else { continue };
        if question.hard_filter {
            continue;
        }
        let Some(a_record) = a.response(question_id) else { continue };

        let s_q = match b.response(question_id) {
            Some(b_record) => match similarity(question, a_record, b_record, config) {
                Some(score) => score,
                None => continue, // ai_sentiment: excluded from scoring
            },
            None => config.prefer_not_answer_similarity,
        };

        let importance_a = config.importance_weight(a_record.importance);
        let importance_b = b
            .response(question_id)
            .map(|r| config.importance_weight(r.importance))
            .unwrap_or(0.0);
        let weight = importance_a.max(importance_b);

        *section_weighted_sum.entry(question.section).or_insert(0.0) += weight * s_q;
        *section_weight_total.entry(question.section).or_insert(0.0) += weight;
        *section_unweighted_sum.entry(question.section).or_insert(0.0) += s_q;
        *section_count.entry(question.section).or_insert(0) += 1;
    }

    let score_for = |section: Section| -> f64 {
        let count = *section_count.get(&section).unwrap_or(&0);
        if count == 0 {
            return 0.0;
        }
        let weight_total = *section_weight_total.get(&section).unwrap_or(&0.0);
        if weight_total > 0.0 {
            section_weighted_sum.get(&section).copied().unwrap_or(0.0) / weight_total
        } else {
            section_unweighted_sum.get(&section).copied().unwrap_or(0.0) / count as f64
        }
    };

    let score_l = score_for(Section::Lifestyle);
    let score_p = score_for(Section::Personality);

    let w_l = config.section_weight(Section::Lifestyle);
    let w_p = config.section_weight(Section::Personality);

    100.0 * (w_l * score_l + w_p * score_p)
}
