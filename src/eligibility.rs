//! Eligibility filter: absolute and relative (personal-best)
//! thresholds over the pairs that already passed the hard filter.

use std::collections::HashMap;

use crate::config::MatchingConfig;

/// Canonical secondary sort key for deterministic tie-breaking on a pair:
/// `(min(id_a, id_b), max(id_a, id_b))`. Shared by the eligibility filter's
/// own tie-breaks and by the global matcher's edge ordering.
pub fn tie_break_key(a_id: &str, b_id: &str) -> (String, String) {
    if a_id <= b_id {
        (a_id.to_string(), b_id.to_string())
    } else {
        (b_id.to_string(), a_id.to_string())
    }
}

/// One ordered-pair-turned-undirected candidate that already passed the
/// hard filter in both directions, carrying both directional
/// scores and their symmetric combination.
#[derive(Debug, Clone)]
pub struct CandidatePair {
    pub a_id: String,
    pub b_id: String,
    pub score_a_to_b: f64,
    pub score_b_to_a: f64,
    pub pair_score: f64,
}

/// A candidate that cleared both the hard filter and the absolute
/// threshold, plus whether it also cleared the relative threshold.
#[derive(Debug, Clone)]
pub struct EligiblePair {
    pub a_id: String,
    pub b_id: String,
    pub score_a_to_b: f64,
    pub score_b_to_a: f64,
    pub pair_score: f64,
}

/// `best_out_score(X)` per user — the maximum directional score X sends to
/// any partner that passed hard filter + absolute threshold.
/// `perfectionist_threshold` is reused by diagnostics to classify users
/// whose best score never clears `absolute_threshold_min`.
pub fn personal_best_scores(candidates: &[CandidatePair]) -> HashMap<String, f64> {
    let mut best: HashMap<String, f64> = HashMap::new();
    for candidate in candidates {
        let entry_a = best.entry(candidate.a_id.clone()).or_insert(0.0);
        if candidate.score_a_to_b > *entry_a {
            *entry_a = candidate.score_a_to_b;
        }
        let entry_b = best.entry(candidate.b_id.clone()).or_insert(0.0);
        if candidate.score_b_to_a > *entry_b {
            *entry_b = candidate.score_b_to_a;
        }
    }
    best
}

/// Applies the absolute threshold (step 2) then the relative threshold
/// (step 3) and returns the surviving pairs.
pub fn eligible_pairs(candidates: &[CandidatePair], config: &MatchingConfig) -> Vec<EligiblePair> {
    let above_absolute: Vec<&CandidatePair> = candidates
        .iter()
        .filter(|c| c.pair_score >= config.absolute_threshold_min)
        .collect();

    let personal_best = personal_best_scores(
        &above_absolute.iter().map(|c| (*c).clone()).collect::<Vec<_>>(),
    );

    let beta = config.relative_threshold_beta;
    above_absolute
        .into_iter()
        .filter(|c| {
            let best_a = personal_best.get(&c.a_id).copied().unwrap_or(0.0);
            let best_b = personal_best.get(&c.b_id).copied().unwrap_or(0.0);
            c.score_a_to_b >= beta * best_a && c.score_b_to_a >= beta * best_b
        })
        .map(|c| EligiblePair {
            a_id: c.a_id.clone(),
            b_id: c.b_id.clone(),
            score_a_to_b: c.score_a_to_b,
            score_b_to_a: c.score_b_to_a,
            pair_score: c.pair_score,
        })
        .collect()
}

/// A user is a perfectionist if their best directional score (over every
/// hard-filter-surviving pair, regardless of threshold) never reaches
/// `absolute_threshold_min`.
pub fn is_perfectionist(user_id: &str, all_candidates: &[CandidatePair], config: &MatchingConfig) -> bool {
    let best = personal_best_scores(all_candidates);
    best.get(user_id).copied().unwrap_or(0.0) < config.absolute_threshold_min
}
