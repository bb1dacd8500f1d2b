//! Matching configuration — every numeric knob, collected under one
//! record and passed explicitly to every phase rather than held in
//! process-wide state.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::Section;
use crate::error::MatchingError;

/// Discrete importance label a respondent attaches to a preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Importance {
    NotImportant,
    SomewhatImportant,
    Important,
    VeryImportant,
}

impl Default for Importance {
    /// "defaulting to IMPORTANT if missing for a question that supports
    /// importance".
    fn default() -> Self {
        Self::Important
    }
}

/// All numeric knobs recognized by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub section_weights: HashMap<Section, f64>,
    pub importance_weights: HashMap<Importance, f64>,
    pub mutuality_alpha: f64,
    pub relative_threshold_beta: f64,
    pub absolute_threshold_min: f64,
    pub love_language_weights: LoveLanguageWeights,
    pub conflict_compatibility_matrix: HashMap<String, HashMap<String, f64>>,
    pub sleep_flexibility_bonus: f64,
    pub prefer_not_answer_similarity: f64,

    /// Wall-clock allowance for the global matcher. `None` means no limit.
    #[serde(default)]
    pub matcher_time_budget: Option<Duration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoveLanguageWeights {
    pub show: f64,
    pub receive: f64,
}

impl Default for LoveLanguageWeights {
    fn default() -> Self {
        Self {
            show: 0.5,
            receive: 0.5,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let section_weights = HashMap::from([(Section::Lifestyle, 0.65), (Section::Personality, 0.35)]);
        let importance_weights = HashMap::from([
            (Importance::NotImportant, 0.0),
            (Importance::SomewhatImportant, 0.5),
            (Importance::Important, 1.0),
            (Importance::VeryImportant, 2.0),
        ]);

        Self {
            section_weights,
            importance_weights,
            mutuality_alpha: 0.65,
            relative_threshold_beta: 0.6,
            absolute_threshold_min: 50.0,
            love_language_weights: LoveLanguageWeights::default(),
            conflict_compatibility_matrix: HashMap::new(),
            sleep_flexibility_bonus: 0.1,
            prefer_not_answer_similarity: 0.5,
            matcher_time_budget: None,
        }
    }
}

impl MatchingConfig {
    pub fn from_json(document: &str) -> Result<Self, MatchingError> {
        Ok(serde_json::from_str(document)?)
    }

    pub fn importance_weight(&self, importance: Importance) -> f64 {
        self.importance_weights.get(&importance).copied().unwrap_or(0.0)
    }

    pub fn section_weight(&self, section: Section) -> f64 {
        self.section_weights.get(&section).copied().unwrap_or(0.0)
    }

    /// Look up `matrix[a][b]` for `compatibility_matrix` questions.
    /// Not required to be symmetric.
    pub fn compatibility(&self, a: &str, b: &str) -> Option<f64> {
        self.conflict_compatibility_matrix.get(a)?.get(b).copied()
    }

    /// Enforces each field's admissible range. Fatal: a run never starts on
    /// a config that fails this check.
    pub fn validate(&self) -> Result<(), MatchingError> {
        if !(0.5..=1.0).contains(&self.mutuality_alpha) {
            return Err(MatchingError::InvalidConfig {
                field: "mutuality_alpha",
                value: self.mutuality_alpha.to_string(),
            });
        }
        if self.mutuality_alpha <= 0.5 {
            return Err(MatchingError::InvalidConfig {
                field: "mutuality_alpha",
                value: format!("{} (must be strictly greater than 0.5)", self.mutuality_alpha),
            });
        }
        if !(0.0..=1.0).contains(&self.relative_threshold_beta) || self.relative_threshold_beta == 0.0 {
            return Err(MatchingError::InvalidConfig {
                field: "relative_threshold_beta",
                value: self.relative_threshold_beta.to_string(),
            });
        }
        if !(0.0..=100.0).contains(&self.absolute_threshold_min) {
            return Err(MatchingError::InvalidConfig {
                field: "absolute_threshold_min",
                value: self.absolute_threshold_min.to_string(),
            });
        }
        if self.section_weights.values().any(|w| *w < 0.0) {
            return Err(MatchingError::InvalidConfig {
                field: "section_weights",
                value: "negative weight".to_string(),
            });
        }
        if self.importance_weights.values().any(|w| *w < 0.0) {
            return Err(MatchingError::InvalidConfig {
                field: "importance_weights",
                value: "negative weight".to_string(),
            });
        }
        if self.love_language_weights.show < 0.0 || self.love_language_weights.receive < 0.0 {
            return Err(MatchingError::InvalidConfig {
                field: "love_language_weights",
                value: "negative weight".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(MatchingConfig::default().validate().is_ok());
    }

    #[test]
    fn alpha_at_the_floor_is_rejected() {
        let mut config = MatchingConfig::default();
        config.mutuality_alpha = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn alpha_above_one_is_rejected() {
        let mut config = MatchingConfig::default();
        config.mutuality_alpha = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn absolute_threshold_out_of_range_is_rejected() {
        let mut config = MatchingConfig::default();
        config.absolute_threshold_min = 150.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_importance_is_important() {
        assert_eq!(Importance::default(), Importance::Important);
    }
}
