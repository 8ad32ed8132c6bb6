//! Transaction threat profile
//!
//! 0-100 scale. Detectors: method-signature table, value/gas heuristics,
//! external intel feeds. Multipliers reward cross-category corroboration
//! (approval evidence backed by intel is much worse than either alone).

use std::sync::Arc;

use crate::core::engine::Engine;
use crate::core::rules::{AlertRule, RuleCondition};
use crate::detectors::external_intel::{ExternalIntelDetector, IntelFeed};
use crate::detectors::method_signature::MethodSignatureDetector;
use crate::detectors::value_gas::ValueGasDetector;
use crate::detectors::DetectorRegistry;
use crate::models::config::{
    CategoryCount, CategoryMultiplierTable, EngineConfig, FalsePositiveConfig, LevelThresholds,
    MultiplierRule, ScoreScale,
};
use crate::models::errors::EngineResult;
use crate::models::input::TxDescriptor;
use crate::models::signal::SignalCategory;
use crate::models::verdict::RiskLevel;
use crate::utils::cache::IntelCache;
use crate::utils::constants::DEFAULT_DETECTOR_TIMEOUT_MS;

pub fn default_config() -> EngineConfig {
    let mut false_positive = FalsePositiveConfig::default();
    // Plain ERC-20 transfers are the single most common legitimate call.
    false_positive
        .canonical_selectors
        .insert("0xa9059cbb".to_string());
    false_positive
        .canonical_selectors
        .insert("0x23b872dd".to_string());

    EngineConfig {
        scale: ScoreScale {
            min: 0.0,
            max: 100.0,
            low_severity_ceiling: 25.0,
        },
        thresholds: LevelThresholds {
            critical: 80.0,
            high: 60.0,
            medium: 40.0,
            low: 20.0,
        },
        multipliers: CategoryMultiplierTable {
            rules: vec![
                MultiplierRule {
                    label: "ownership_cluster".into(),
                    requires: vec![CategoryCount {
                        category: SignalCategory::Ownership,
                        min_count: 2,
                    }],
                    factor: 1.25,
                },
                MultiplierRule {
                    label: "ownership_liquidity".into(),
                    requires: vec![
                        CategoryCount {
                            category: SignalCategory::Ownership,
                            min_count: 1,
                        },
                        CategoryCount {
                            category: SignalCategory::Liquidity,
                            min_count: 1,
                        },
                    ],
                    factor: 1.3,
                },
                MultiplierRule {
                    label: "approval_with_intel".into(),
                    requires: vec![
                        CategoryCount {
                            category: SignalCategory::Approval,
                            min_count: 1,
                        },
                        CategoryCount {
                            category: SignalCategory::ExternalIntel,
                            min_count: 1,
                        },
                    ],
                    factor: 1.4,
                },
                MultiplierRule {
                    label: "intel_corroborated".into(),
                    requires: vec![CategoryCount {
                        category: SignalCategory::ExternalIntel,
                        min_count: 2,
                    }],
                    factor: 1.2,
                },
            ],
        },
        false_positive,
        rules: default_rules(),
        detector_timeout_ms: DEFAULT_DETECTOR_TIMEOUT_MS,
    }
}

fn default_rules() -> Vec<AlertRule> {
    vec![
        AlertRule {
            id: "unlimited-approval".into(),
            condition: RuleCondition::AnyOf(vec![
                RuleCondition::HasSignalKind("UNLIMITED_APPROVAL".into()),
                RuleCondition::HasSignalKind("UNLIMITED_PERMIT".into()),
            ]),
            severity: RiskLevel::Critical,
            message: "unlimited token approval requested".into(),
            actions: vec!["revoke_approval".into(), "notify_user".into()],
        },
        AlertRule {
            id: "critical-threat".into(),
            condition: RuleCondition::LevelAtLeast(RiskLevel::Critical),
            severity: RiskLevel::Critical,
            message: "critical transaction threat".into(),
            actions: vec!["block_recommendation".into(), "notify_user".into()],
        },
        AlertRule {
            id: "high-threat".into(),
            condition: RuleCondition::LevelAtLeast(RiskLevel::High),
            severity: RiskLevel::High,
            message: "high-risk transaction".into(),
            actions: vec!["notify_user".into()],
        },
        AlertRule {
            id: "intel-flagged".into(),
            condition: RuleCondition::AnyOf(vec![
                RuleCondition::HasSignalKind("SCAM_BLOCKLIST".into()),
                RuleCondition::HasSignalKind("ATTACK_PATTERN_MATCH".into()),
            ]),
            severity: RiskLevel::High,
            message: "counterparty flagged by external intelligence".into(),
            actions: vec!["notify_user".into()],
        },
    ]
}

/// Assemble the transaction engine with the standard detector set.
pub fn build(
    config: EngineConfig,
    feeds: Vec<Arc<dyn IntelFeed>>,
) -> EngineResult<Engine<TxDescriptor>> {
    let mut registry = DetectorRegistry::new();
    registry.register(Arc::new(MethodSignatureDetector::new()));
    registry.register(Arc::new(ValueGasDetector::new()));
    if !feeds.is_empty() {
        registry.register(Arc::new(ExternalIntelDetector::new(
            feeds,
            IntelCache::default(),
        )));
    }
    Engine::new("transaction", config, registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(default_config().validate().is_ok());
    }

    #[test]
    fn builds_without_feeds() {
        let engine = build(default_config(), vec![]).unwrap();
        assert_eq!(engine.name(), "transaction");
    }
}
