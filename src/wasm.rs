//! JSON-in/JSON-out WASM facade (feature `wasm`), preserving the crate's
//! original WebAssembly surface for the (out-of-scope) admin console that
//! triggers batch runs.

use wasm_bindgen::prelude::*;

use crate::catalog::QuestionCatalog;
use crate::config::MatchingConfig;
use crate::pipeline::{run_matching, validate_matching};
use crate::response::{normalize_respondent, RawRespondent};

/// Runs one full matching pass over JSON-encoded inputs and returns a
/// JSON-encoded `MatchingResult`-shaped document. Serialization errors
/// and pipeline errors are both surfaced as a JS exception string.
#[wasm_bindgen]
pub fn run_matching_json(
    respondents_json: &str,
    catalog_json: &str,
    config_json: &str,
) -> Result<String, JsValue> {
    let raw_respondents: Vec<RawRespondent> =
        serde_json::from_str(respondents_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let catalog =
        QuestionCatalog::from_json(catalog_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let config =
        MatchingConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let mut respondents = Vec::with_capacity(raw_respondents.len());
    for raw in &raw_respondents {
        let normalized =
            normalize_respondent(raw, &catalog).map_err(|e| JsValue::from_str(&e.to_string()))?;
        respondents.push(normalized);
    }

    let result = run_matching(&respondents, &catalog, &config, None)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    #[derive(serde::Serialize)]
    struct MatchOut<'a> {
        user_a_id: &'a str,
        user_b_id: &'a str,
        pair_score: f64,
        score_a_to_b: f64,
        score_b_to_a: f64,
    }

    #[derive(serde::Serialize)]
    struct Output<'a> {
        matches: Vec<MatchOut<'a>>,
        matches_produced: usize,
        unmatched_count: usize,
    }

    let output = Output {
        matches: result
            .matches
            .iter()
            .map(|m| MatchOut {
                user_a_id: &m.user_a_id,
                user_b_id: &m.user_b_id,
                pair_score: m.pair_score,
                score_a_to_b: m.score_a_to_b,
                score_b_to_a: m.score_b_to_a,
            })
            .collect(),
        matches_produced: result.diagnostics.matches_produced,
        unmatched_count: result.unmatched.len(),
    };

    serde_json::to_string(&output).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Validates a JSON-encoded match list against the output invariants and
/// returns a JSON-encoded `{ok, errors}` report. `mutuality_alpha` must
/// match the value the matches were produced with, since it is needed to
/// recheck each `pair_score` against the pair combiner's formula.
#[wasm_bindgen]
pub fn validate_matching_json(matches_json: &str, mutuality_alpha: f64) -> Result<String, JsValue> {
    #[derive(serde::Deserialize)]
    struct MatchIn {
        user_a_id: String,
        user_b_id: String,
        pair_score: f64,
        score_a_to_b: f64,
        score_b_to_a: f64,
    }

    let parsed: Vec<MatchIn> =
        serde_json::from_str(matches_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let matches: Vec<crate::matching::Match> = parsed
        .into_iter()
        .map(|m| crate::matching::Match {
            user_a_id: m.user_a_id,
            user_b_id: m.user_b_id,
            pair_score: m.pair_score,
            score_a_to_b: m.score_a_to_b,
            score_b_to_a: m.score_b_to_a,
        })
        .collect();

    let report = validate_matching(&matches, mutuality_alpha);

    #[derive(serde::Serialize)]
    struct ReportOut {
        ok: bool,
        errors: Vec<String>,
    }

    serde_json::to_string(&ReportOut { ok: report.ok, errors: report.errors })
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
