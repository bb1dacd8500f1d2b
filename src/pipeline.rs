//! Orchestrates the full pipeline: normalize → score → filter → match →
//! aggregate. The single public entry point callers use.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::catalog::QuestionCatalog;
use crate::combiner::pair_score;
use crate::config::MatchingConfig;
use crate::diagnostics::{aggregate, Diagnostics};
use crate::eligibility::{eligible_pairs, CandidatePair};
use crate::error::MatchingError;
use crate::hard_filter::{evaluate_pair, HardFilterViolation};
use crate::matching::{run_global_matcher, Match, Unmatched};
use crate::response::Respondent;
use crate::scorer::directional_score;

/// The full output of one matching run.
#[derive(Debug, Clone)]
pub struct MatchingResult {
    pub matches: Vec<Match>,
    pub unmatched: Vec<Unmatched>,
    pub diagnostics: Diagnostics,
}

/// Result of `validate_matching`.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
}

/// Cancellation token threaded between phases; checked only at phase
/// boundaries, never mid-phase. `None` means never cancel.
pub type CancellationFlag<'a> = Option<&'a AtomicBool>;

fn is_cancelled(flag: CancellationFlag<'_>) -> bool {
    flag.map(|f| f.load(Ordering::Relaxed)).unwrap_or(false)
}

fn cancelled_err() -> MatchingError {
    MatchingError::MatcherFailed("run cancelled between phases".to_string())
}

/// Outcome of scoring a single ordered pair: either it was rejected by the
/// hard filter, or it produced a scored candidate.
enum PairOutcome {
    Violation(HardFilterViolation),
    Candidate(CandidatePair),
}

fn score_one_pair(
    (i, j): (usize, usize),
    users: &[Respondent],
    catalog: &QuestionCatalog,
    config: &MatchingConfig,
) -> PairOutcome {
    let a = &users[i];
    let b = &users[j];
    if let Err(violation) = evaluate_pair(a, b, catalog, config) {
        return PairOutcome::Violation(violation);
    }

    let score_a_to_b = directional_score(a, b, catalog, config);
    let score_b_to_a = directional_score(b, a, catalog, config);
    let pair = pair_score(score_a_to_b, score_b_to_a, config);
    debug!(a = %a.id, b = %b.id, pair, "scored candidate pair");

    PairOutcome::Candidate(CandidatePair {
        a_id: a.id.clone(),
        b_id: b.id.clone(),
        score_a_to_b,
        score_b_to_a,
        pair_score: pair,
    })
}

/// Scores every ordered pair named by `pair_indices`. Sharded across a
/// rayon thread pool when the `parallel` feature is enabled, since pair
/// scoring is embarrassingly parallel; a plain sequential map otherwise.
/// Output order always matches `pair_indices`, so downstream aggregation
/// stays independent of which thread scored which pair.
#[cfg(feature = "parallel")]
fn score_pairs(
    pair_indices: &[(usize, usize)],
    users: &[Respondent],
    catalog: &QuestionCatalog,
    config: &MatchingConfig,
) -> Vec<PairOutcome> {
    use rayon::prelude::*;
    pair_indices
        .par_iter()
        .map(|&pair| score_one_pair(pair, users, catalog, config))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn score_pairs(
    pair_indices: &[(usize, usize)],
    users: &[Respondent],
    catalog: &QuestionCatalog,
    config: &MatchingConfig,
) -> Vec<PairOutcome> {
    pair_indices
        .iter()
        .map(|&pair| score_one_pair(pair, users, catalog, config))
        .collect()
}

/// Single entry point: `run_matching(users, catalog, config)`.
#[instrument(skip(users, catalog, config, cancel), fields(users = users.len()))]
pub fn run_matching(
    users: &[Respondent],
    catalog: &QuestionCatalog,
    config: &MatchingConfig,
    cancel: CancellationFlag<'_>,
) -> Result<MatchingResult, MatchingError> {
    config.validate()?;

    if is_cancelled(cancel) {
        return Err(cancelled_err());
    }

    info!(count = users.len(), "scoring all ordered pairs");
    let pair_indices: Vec<(usize, usize)> = (0..users.len())
        .flat_map(|i| (i + 1..users.len()).map(move |j| (i, j)))
        .collect();

    let pair_results: Vec<PairOutcome> = score_pairs(&pair_indices, users, catalog, config);

    let mut hard_filter_violations = Vec::new();
    let mut candidates: Vec<CandidatePair> = Vec::new();
    for outcome in pair_results {
        match outcome {
            PairOutcome::Violation(violation) => hard_filter_violations.push(violation),
            PairOutcome::Candidate(candidate) => candidates.push(candidate),
        }
    }

    if is_cancelled(cancel) {
        return Err(cancelled_err());
    }

    let eligible = eligible_pairs(&candidates, config);

    if is_cancelled(cancel) {
        return Err(cancelled_err());
    }

    let all_user_ids: Vec<String> = users.iter().map(|u| u.id.clone()).collect();
    let (matches, unmatched) =
        run_global_matcher(&all_user_ids, &candidates, &eligible, config.matcher_time_budget)?;

    let report = validate_matching(&matches, config.mutuality_alpha);
    if !report.ok {
        return Err(MatchingError::MatcherFailed(report.errors.join("; ")));
    }

    let diagnostics = aggregate(
        users.len(),
        &hard_filter_violations,
        &candidates,
        eligible.len(),
        &matches,
        config,
    );

    Ok(MatchingResult { matches, unmatched, diagnostics })
}

/// Tolerance for comparing a reported `pair_score` against the value
/// recomputed from its directional scores.
const PAIR_SCORE_EPSILON: f64 = 1e-6;

/// Checks the output invariants: no vertex appears twice, no self-matches,
/// every pair score in `[0, 100]`, and every reported `pair_score` equals
/// the pair combiner's output for its directional scores under
/// `mutuality_alpha` (within floating-point tolerance).
pub fn validate_matching(matches: &[Match], mutuality_alpha: f64) -> ValidationReport {
    let mut errors = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for m in matches {
        if m.user_a_id == m.user_b_id {
            errors.push(format!("self-match: {}", m.user_a_id));
        }
        if !seen.insert(m.user_a_id.clone()) {
            errors.push(format!("user {} appears in more than one match", m.user_a_id));
        }
        if !seen.insert(m.user_b_id.clone()) {
            errors.push(format!("user {} appears in more than one match", m.user_b_id));
        }
        if !(0.0..=100.0).contains(&m.pair_score) {
            errors.push(format!(
                "pair ({}, {}) has out-of-range score {}",
                m.user_a_id, m.user_b_id, m.pair_score
            ));
        }
        let recomputed = pair_score(m.score_a_to_b, m.score_b_to_a, &config_with_alpha(mutuality_alpha));
        if (recomputed - m.pair_score).abs() > PAIR_SCORE_EPSILON {
            errors.push(format!(
                "pair ({}, {}) reports pair_score {} but combiner recomputes {recomputed}",
                m.user_a_id, m.user_b_id, m.pair_score
            ));
        }
    }

    ValidationReport { ok: errors.is_empty(), errors }
}

fn config_with_alpha(mutuality_alpha: f64) -> MatchingConfig {
    let mut config = MatchingConfig::default();
    config.mutuality_alpha = mutuality_alpha;
    config
}

/// Convenience wrapper that bounds the matcher with a wall-clock budget
/// without touching `config` (useful for one-off calls in tests/benches).
pub fn run_matching_with_budget(
    users: &[Respondent],
    catalog: &QuestionCatalog,
    config: &MatchingConfig,
    budget: Duration,
) -> Result<MatchingResult, MatchingError> {
    let mut bounded = config.clone();
    bounded.matcher_time_budget = Some(budget);
    run_matching(users, catalog, &bounded, None)
}
