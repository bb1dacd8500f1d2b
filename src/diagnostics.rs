//! Diagnostics aggregator: counts, distributions, and per-user
//! unmatched reasons. Everything here is derived from the other phases'
//! outputs; nothing here mutates pipeline state.

use serde::Serialize;

use crate::config::MatchingConfig;
use crate::eligibility::CandidatePair;
use crate::hard_filter::HardFilterViolation;
use crate::matching::{Match, Unmatched};

/// The five fixed score buckets used for the distribution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoreDistribution {
    pub bucket_0_20: usize,
    pub bucket_20_40: usize,
    pub bucket_40_60: usize,
    pub bucket_60_80: usize,
    pub bucket_80_100: usize,
}

impl ScoreDistribution {
    fn record(&mut self, score: f64) {
        if score < 20.0 {
            self.bucket_0_20 += 1;
        } else if score < 40.0 {
            self.bucket_20_40 += 1;
        } else if score < 60.0 {
            self.bucket_40_60 += 1;
        } else if score < 80.0 {
            self.bucket_60_80 += 1;
        } else {
            self.bucket_80_100 += 1;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HardFilterBreakdown {
    pub gender_rejections: usize,
    pub age_rejections: usize,
    pub dealbreaker_rejections: usize,
}

impl HardFilterBreakdown {
    fn record(&mut self, violation: &HardFilterViolation) {
        match violation {
            HardFilterViolation::Gender => self.gender_rejections += 1,
            HardFilterViolation::AgeRange => self.age_rejections += 1,
            HardFilterViolation::Dealbreaker { .. } => self.dealbreaker_rejections += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub users_considered: usize,
    pub pairs_scored: usize,
    pub pairs_eligible: usize,
    pub matches_produced: usize,
    pub hard_filter_breakdown: HardFilterBreakdown,
    pub score_distribution: ScoreDistribution,
    pub config_snapshot: MatchingConfig,
}

/// Assembles the final diagnostics record from the pipeline's intermediate
/// artifacts. Pure: takes everything it needs as arguments.
pub fn aggregate(
    users_considered: usize,
    hard_filter_violations: &[HardFilterViolation],
    candidates: &[CandidatePair],
    eligible_count: usize,
    matches: &[Match],
    config: &MatchingConfig,
) -> Diagnostics {
    let mut hard_filter_breakdown = HardFilterBreakdown::default();
    for violation in hard_filter_violations {
        hard_filter_breakdown.record(violation);
    }

    let mut score_distribution = ScoreDistribution::default();
    for candidate in candidates {
        score_distribution.record(candidate.pair_score);
    }

    Diagnostics {
        users_considered,
        pairs_scored: candidates.len(),
        pairs_eligible: eligible_count,
        matches_produced: matches.len(),
        hard_filter_breakdown,
        score_distribution,
        config_snapshot: config.clone(),
    }
}

/// Re-exported for callers that only need the unmatched-reason summary
/// rather than the full `Diagnostics` record.
pub fn unmatched_reasons(unmatched: &[Unmatched]) -> Vec<(String, String)> {
    unmatched
        .iter()
        .map(|u| (u.user_id.clone(), format!("{:?}", u.reason)))
        .collect()
}
