//! Social sentiment profile
//!
//! Scores on a 0-10 scale with proportionally smaller thresholds and
//! dampening amounts. Sentiment can flag a token for attention but a pile
//! of mildly negative chatter never classifies above the low-severity
//! ceiling on its own.

use std::sync::Arc;

use crate::core::engine::Engine;
use crate::core::rules::{AlertRule, RuleCondition};
use crate::detectors::sentiment::{MentionVolumeDetector, PlatformSentimentDetector};
use crate::detectors::DetectorRegistry;
use crate::models::config::{
    CategoryCount, CategoryMultiplierTable, EngineConfig, FalsePositiveConfig, LevelThresholds,
    MultiplierRule, ScoreScale,
};
use crate::models::errors::EngineResult;
use crate::models::input::SocialCorpus;
use crate::models::signal::SignalCategory;
use crate::models::verdict::RiskLevel;
use crate::utils::constants::DEFAULT_DETECTOR_TIMEOUT_MS;

pub fn default_config() -> EngineConfig {
    EngineConfig {
        scale: ScoreScale {
            min: 0.0,
            max: 10.0,
            low_severity_ceiling: 3.0,
        },
        thresholds: LevelThresholds {
            critical: 8.0,
            high: 6.0,
            medium: 4.0,
            low: 2.0,
        },
        multipliers: CategoryMultiplierTable {
            rules: vec![MultiplierRule {
                label: "cross_platform".into(),
                requires: vec![CategoryCount {
                    category: SignalCategory::Sentiment,
                    min_count: 2,
                }],
                factor: 1.3,
            }],
        },
        false_positive: FalsePositiveConfig {
            // Dampening amounts scaled to the 0-10 range.
            allowlist_dampening: 1.5,
            canonical_dampening: 1.0,
            low_risk_window_dampening: 0.5,
            corrected_dampening: 1.0,
            ..Default::default()
        },
        rules: default_rules(),
        detector_timeout_ms: DEFAULT_DETECTOR_TIMEOUT_MS,
    }
}

fn default_rules() -> Vec<AlertRule> {
    vec![
        AlertRule {
            id: "sentiment-critical".into(),
            condition: RuleCondition::LevelAtLeast(RiskLevel::Critical),
            severity: RiskLevel::Critical,
            message: "overwhelmingly negative sentiment".into(),
            actions: vec!["notify_user".into()],
        },
        AlertRule {
            id: "negative-surge".into(),
            condition: RuleCondition::AllOf(vec![
                RuleCondition::HasSignalKind("MENTION_SURGE".into()),
                RuleCondition::HasSignalKind("NEGATIVE_SENTIMENT".into()),
            ]),
            severity: RiskLevel::High,
            message: "negative mention surge in progress".into(),
            actions: vec!["notify_user".into()],
        },
    ]
}

/// Assemble the social sentiment engine.
pub fn build(config: EngineConfig) -> EngineResult<Engine<SocialCorpus>> {
    let mut registry = DetectorRegistry::new();
    registry.register(Arc::new(PlatformSentimentDetector));
    registry.register(Arc::new(MentionVolumeDetector));
    Engine::new("social", config, registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(default_config().validate().is_ok());
    }

    #[test]
    fn builds() {
        let engine = build(default_config()).unwrap();
        assert_eq!(engine.name(), "social");
    }
}
