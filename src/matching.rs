//! Global matcher: builds the weighted undirected graph from
//! eligible pairs and runs maximum-weight matching over it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use ordered_float::OrderedFloat;

use crate::blossom::max_weight_matching;
use crate::eligibility::{personal_best_scores, tie_break_key, CandidatePair, EligiblePair};
use crate::error::MatchingError;

/// One produced match, carrying both directional scores alongside the
/// symmetric pair score.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub user_a_id: String,
    pub user_b_id: String,
    pub pair_score: f64,
    pub score_a_to_b: f64,
    pub score_b_to_a: f64,
}

/// Why a user was left out of the final assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum UnmatchedReason {
    NoEligiblePairs,
    BestCandidateMatchedWithAnother { candidate_id: String, would_have_been_score: f64 },
    BelowAbsoluteThreshold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unmatched {
    pub user_id: String,
    pub reason: UnmatchedReason,
}

/// Runs the Blossom matcher over `eligible` and classifies every user in
/// `all_user_ids` that didn't end up matched. Vertices are assigned in
/// ascending user-id order so the Blossom tie-breaking (by vertex index)
/// matches `tie_break_key`'s `(min(id_a,id_b), max(id_a,id_b))` rule.
pub fn run_global_matcher(
    all_user_ids: &[String],
    all_candidates: &[CandidatePair],
    eligible: &[EligiblePair],
    time_budget: Option<Duration>,
) -> Result<(Vec<Match>, Vec<Unmatched>), MatchingError> {
    let started = Instant::now();

    let mut ordered_ids: Vec<String> = all_user_ids.to_vec();
    ordered_ids.sort();
    let index_of: HashMap<&str, usize> = ordered_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let mut edges: Vec<(usize, usize, f64)> = Vec::with_capacity(eligible.len());
    for pair in eligible {
        let (Some(&i), Some(&j)) = (index_of.get(pair.a_id.as_str()), index_of.get(pair.b_id.as_str())) else {
            continue;
        };
        if i == j {
            continue; // never produce self-loops
        }
        edges.push((i.min(j), i.max(j), pair.pair_score));
    }
    // Edge endpoints are already (min_index, max_index), and indices were
    // assigned from `ordered_ids` sorted ascending, so this ordering agrees
    // with `tie_break_key` without needing to re-derive string keys here.
    edges.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

    check_budget(&started, time_budget)?;

    let mate = max_weight_matching(ordered_ids.len(), &edges);

    check_budget(&started, time_budget)?;

    let eligible_by_pair: HashMap<(usize, usize), &EligiblePair> = eligible
        .iter()
        .filter_map(|pair| {
            let i = *index_of.get(pair.a_id.as_str())?;
            let j = *index_of.get(pair.b_id.as_str())?;
            Some(((i.min(j), i.max(j)), pair))
        })
        .collect();

    let mut matches = Vec::new();
    let mut seen = vec![false; ordered_ids.len()];
    for i in 0..ordered_ids.len() {
        if seen[i] {
            continue;
        }
        if let Some(j) = mate[i] {
            if j <= i {
                continue;
            }
            seen[i] = true;
            seen[j] = true;
            let Some(pair) = eligible_by_pair.get(&(i, j)) else { continue };
            let (user_a, user_b, score_a_to_b, score_b_to_a) = if ordered_ids[i] < ordered_ids[j] {
                (&ordered_ids[i], &ordered_ids[j], pair.score_a_to_b, pair.score_b_to_a)
            } else {
                (&ordered_ids[j], &ordered_ids[i], pair.score_b_to_a, pair.score_a_to_b)
            };
            matches.push(Match {
                user_a_id: user_a.clone(),
                user_b_id: user_b.clone(),
                pair_score: pair.pair_score,
                score_a_to_b,
                score_b_to_a,
            });
        }
    }
    matches.sort_by(|a, b| tie_break_key(&a.user_a_id, &a.user_b_id).cmp(&tie_break_key(&b.user_a_id, &b.user_b_id)));

    let matched_ids: std::collections::HashSet<&str> = matches
        .iter()
        .flat_map(|m| [m.user_a_id.as_str(), m.user_b_id.as_str()])
        .collect();

    let personal_best = personal_best_scores(all_candidates);
    let mut unmatched = Vec::new();
    for user_id in &ordered_ids {
        if matched_ids.contains(user_id.as_str()) {
            continue;
        }
        let reason = classify_unmatched(user_id, all_candidates, eligible, &personal_best, &matched_ids);
        unmatched.push(Unmatched { user_id: user_id.clone(), reason });
    }

    Ok((matches, unmatched))
}

fn check_budget(started: &Instant, budget: Option<Duration>) -> Result<(), MatchingError> {
    if let Some(budget) = budget {
        if started.elapsed() > budget {
            return Err(MatchingError::TimeBudgetExceeded {
                elapsed_ms: started.elapsed().as_millis(),
                budget_ms: budget.as_millis(),
            });
        }
    }
    Ok(())
}

fn classify_unmatched(
    user_id: &str,
    all_candidates: &[CandidatePair],
    eligible: &[EligiblePair],
    personal_best: &HashMap<String, f64>,
    matched_ids: &std::collections::HashSet<&str>,
) -> UnmatchedReason {
    let has_any_candidate = all_candidates.iter().any(|c| c.a_id == user_id || c.b_id == user_id);
    if !has_any_candidate {
        return UnmatchedReason::NoEligiblePairs;
    }

    let has_eligible = eligible.iter().any(|e| e.a_id == user_id || e.b_id == user_id);
    if !has_eligible {
        let best_score = personal_best.get(user_id).copied().unwrap_or(0.0);
        return if best_score > 0.0 {
            UnmatchedReason::BelowAbsoluteThreshold
        } else {
            UnmatchedReason::NoEligiblePairs
        };
    }

    let best_candidate = eligible
        .iter()
        .filter(|e| e.a_id == user_id || e.b_id == user_id)
        .max_by_key(|e| (OrderedFloat(e.pair_score), tie_break_key(&e.a_id, &e.b_id)));

    match best_candidate {
        Some(best) => {
            let (candidate_id, would_have_been_score) = if best.a_id == user_id {
                (best.b_id.clone(), best.score_a_to_b)
            } else {
                (best.a_id.clone(), best.score_b_to_a)
            };
            UnmatchedReason::BestCandidateMatchedWithAnother { candidate_id, would_have_been_score }
        }
        None => UnmatchedReason::BelowAbsoluteThreshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(a: &str, b: &str, a_to_b: f64, b_to_a: f64, pair: f64) -> CandidatePair {
        CandidatePair {
            a_id: a.to_string(),
            b_id: b.to_string(),
            score_a_to_b: a_to_b,
            score_b_to_a: b_to_a,
            pair_score: pair,
        }
    }

    fn eligible(a: &str, b: &str, a_to_b: f64, b_to_a: f64, pair: f64) -> EligiblePair {
        EligiblePair {
            a_id: a.to_string(),
            b_id: b.to_string(),
            score_a_to_b: a_to_b,
            score_b_to_a: b_to_a,
            pair_score: pair,
        }
    }

    #[test]
    fn two_users_one_pair_produces_one_match() {
        let ids = vec!["alice".to_string(), "bob".to_string()];
        let candidates = vec![candidate("alice", "bob", 95.0, 95.0, 95.0)];
        let eligible_pairs = vec![eligible("alice", "bob", 95.0, 95.0, 95.0)];
        let (matches, unmatched) = run_global_matcher(&ids, &candidates, &eligible_pairs, None).unwrap();
        assert_eq!(matches.len(), 1);
        assert!(unmatched.is_empty());
    }

    #[test]
    fn triangle_produces_one_match_and_one_unmatched_with_candidate() {
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let candidates = vec![
            candidate("a", "b", 90.0, 90.0, 90.0),
            candidate("b", "c", 90.0, 90.0, 90.0),
            candidate("a", "c", 90.0, 90.0, 90.0),
        ];
        let eligible_pairs = vec![
            eligible("a", "b", 90.0, 90.0, 90.0),
            eligible("b", "c", 90.0, 90.0, 90.0),
            eligible("a", "c", 90.0, 90.0, 90.0),
        ];
        let (matches, unmatched) = run_global_matcher(&ids, &candidates, &eligible_pairs, None).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(unmatched.len(), 1);
        if let UnmatchedReason::BestCandidateMatchedWithAnother { candidate_id, .. } = &unmatched[0].reason {
            let matched_any = matches
                .iter()
                .any(|m| &m.user_a_id == candidate_id || &m.user_b_id == candidate_id);
            assert!(matched_any);
        } else {
            panic!("expected BestCandidateMatchedWithAnother");
        }
    }

    #[test]
    fn user_with_no_candidates_is_no_eligible_pairs() {
        let ids = vec!["lonely".to_string(), "a".to_string(), "b".to_string()];
        let candidates = vec![candidate("a", "b", 90.0, 90.0, 90.0)];
        let eligible_pairs = vec![eligible("a", "b", 90.0, 90.0, 90.0)];
        let (_matches, unmatched) = run_global_matcher(&ids, &candidates, &eligible_pairs, None).unwrap();
        let lonely = unmatched.iter().find(|u| u.user_id == "lonely").unwrap();
        assert_eq!(lonely.reason, UnmatchedReason::NoEligiblePairs);
    }

    #[test]
    fn no_matches_when_no_eligible_pairs_exist() {
        let ids = vec!["a".to_string(), "b".to_string()];
        let (matches, unmatched) = run_global_matcher(&ids, &[], &[], None).unwrap();
        assert!(matches.is_empty());
        assert_eq!(unmatched.len(), 2);
    }
}
