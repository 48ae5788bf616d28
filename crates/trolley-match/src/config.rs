//! Matcher configuration.
//!
//! Weights and thresholds were empirically tuned and keep changing, so they
//! are an explicit value passed into the engine rather than module-level
//! constants. `Default` carries the production tuning.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use trolley_model::ConfidenceTier;

/// Invalid matcher configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("negative signal weight: {name} = {value}")]
    NegativeWeight { name: &'static str, value: f64 },
    #[error("threshold out of range 0-100: {name} = {value}")]
    ThresholdRange { name: &'static str, value: f64 },
    #[error("confidence thresholds out of order: high {high} must exceed medium {medium}")]
    ThresholdOrder { high: f64, medium: f64 },
    #[error("price difference threshold must be positive, got {0}")]
    NonPositivePriceThreshold(f64),
}

/// Relative weight of each matching signal, in score points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    pub token_overlap: f64,
    pub category: f64,
    pub price: f64,
    pub learned: f64,
    pub fuzzy: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            token_overlap: 35.0,
            category: 20.0,
            price: 15.0,
            learned: 20.0,
            fuzzy: 10.0,
        }
    }
}

impl SignalWeights {
    pub fn total(&self) -> f64 {
        self.token_overlap + self.category + self.price + self.learned + self.fuzzy
    }
}

/// Tunable weights and thresholds for the multi-signal matcher.
///
/// Reason thresholds gate *explanation* only: a sub-threshold signal still
/// contributes its partial weighted score, it just is not listed as a reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub weights: SignalWeights,
    /// Minimum token-overlap score to be listed as a reason.
    pub token_reason_threshold: f64,
    /// Minimum fuzzy-similarity score to be listed as a reason.
    pub fuzzy_reason_threshold: f64,
    /// Minimum price-proximity score to be listed as a reason.
    pub price_reason_threshold: f64,
    /// Top score at or above this is a high-confidence (auto-apply) match.
    pub high_confidence_threshold: f64,
    /// Top score at or above this (but below high) needs user confirmation.
    pub medium_confidence_threshold: f64,
    /// Bonus added when the strict duplicate-name predicate independently
    /// agrees with the weighted signals. Total score stays capped at 100.
    pub duplicate_name_bonus: f64,
    /// Percentage price difference at which price proximity reaches zero.
    pub price_diff_threshold_pct: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            token_reason_threshold: 50.0,
            fuzzy_reason_threshold: 70.0,
            price_reason_threshold: 50.0,
            high_confidence_threshold: 70.0,
            medium_confidence_threshold: 45.0,
            duplicate_name_bonus: 15.0,
            price_diff_threshold_pct: 25.0,
        }
    }
}

impl MatchConfig {
    /// Checks weight and threshold sanity. Call once at deployment-config
    /// load time; `Default` always validates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("token_overlap", self.weights.token_overlap),
            ("category", self.weights.category),
            ("price", self.weights.price),
            ("learned", self.weights.learned),
            ("fuzzy", self.weights.fuzzy),
            ("duplicate_name_bonus", self.duplicate_name_bonus),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeWeight { name, value });
            }
        }
        for (name, value) in [
            ("token_reason_threshold", self.token_reason_threshold),
            ("fuzzy_reason_threshold", self.fuzzy_reason_threshold),
            ("price_reason_threshold", self.price_reason_threshold),
            ("high_confidence_threshold", self.high_confidence_threshold),
            (
                "medium_confidence_threshold",
                self.medium_confidence_threshold,
            ),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::ThresholdRange { name, value });
            }
        }
        if self.high_confidence_threshold <= self.medium_confidence_threshold {
            return Err(ConfigError::ThresholdOrder {
                high: self.high_confidence_threshold,
                medium: self.medium_confidence_threshold,
            });
        }
        if self.price_diff_threshold_pct <= 0.0 {
            return Err(ConfigError::NonPositivePriceThreshold(
                self.price_diff_threshold_pct,
            ));
        }
        Ok(())
    }

    /// Buckets a top-candidate score into an action-policy tier.
    pub fn tier_for(&self, score: f64) -> ConfidenceTier {
        if score >= self.high_confidence_threshold {
            ConfidenceTier::High
        } else if score >= self.medium_confidence_threshold {
            ConfidenceTier::Medium
        } else if score > 0.0 {
            ConfidenceTier::Low
        } else {
            ConfidenceTier::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert_eq!(MatchConfig::default().validate(), Ok(()));
        assert_eq!(SignalWeights::default().total(), 100.0);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let mut config = MatchConfig::default();
        config.weights.category = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeWeight { name: "category", .. })
        ));
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let config = MatchConfig {
            high_confidence_threshold: 40.0,
            medium_confidence_threshold: 45.0,
            ..MatchConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn tier_boundaries() {
        let config = MatchConfig::default();
        assert_eq!(config.tier_for(70.0), ConfidenceTier::High);
        assert_eq!(config.tier_for(69.9), ConfidenceTier::Medium);
        assert_eq!(config.tier_for(45.0), ConfidenceTier::Medium);
        assert_eq!(config.tier_for(44.9), ConfidenceTier::Low);
        assert_eq!(config.tier_for(0.0), ConfidenceTier::None);
    }
}
