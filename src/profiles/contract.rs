//! Contract / tokenomics risk profile
//!
//! Same aggregation algorithm and 0-100 scale as the transaction profile;
//! different detectors and multiplier table. Owner controls combined with
//! shallow liquidity is the classic rug setup, so those clusters amplify.

use std::sync::Arc;

use crate::core::engine::Engine;
use crate::core::rules::{AlertRule, RuleCondition};
use crate::detectors::external_intel::{ExternalIntelDetector, IntelFeed};
use crate::detectors::tokenomics::{
    CentralizedControlDetector, HolderDistributionDetector, LiquidityDetector,
};
use crate::detectors::DetectorRegistry;
use crate::models::config::{
    CategoryCount, CategoryMultiplierTable, EngineConfig, FalsePositiveConfig, LevelThresholds,
    MultiplierRule, ScoreScale,
};
use crate::models::errors::EngineResult;
use crate::models::input::ContractSnapshot;
use crate::models::signal::SignalCategory;
use crate::models::verdict::RiskLevel;
use crate::utils::cache::IntelCache;
use crate::utils::constants::DEFAULT_DETECTOR_TIMEOUT_MS;

pub fn default_config() -> EngineConfig {
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
                    label: "control_cluster".into(),
                    requires: vec![CategoryCount {
                        category: SignalCategory::Ownership,
                        min_count: 2,
                    }],
                    factor: 1.3,
                },
                MultiplierRule {
                    label: "whale_plus_liquidity".into(),
                    requires: vec![
                        CategoryCount {
                            category: SignalCategory::Transfer,
                            min_count: 1,
                        },
                        CategoryCount {
                            category: SignalCategory::Liquidity,
                            min_count: 1,
                        },
                    ],
                    factor: 1.35,
                },
                MultiplierRule {
                    label: "control_plus_liquidity".into(),
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
                    factor: 1.25,
                },
            ],
        },
        false_positive: FalsePositiveConfig::default(),
        rules: default_rules(),
        detector_timeout_ms: DEFAULT_DETECTOR_TIMEOUT_MS,
    }
}

fn default_rules() -> Vec<AlertRule> {
    vec![
        AlertRule {
            id: "critical-risk".into(),
            condition: RuleCondition::LevelAtLeast(RiskLevel::Critical),
            severity: RiskLevel::Critical,
            message: "critical contract risk".into(),
            actions: vec!["block_recommendation".into(), "notify_user".into()],
        },
        AlertRule {
            id: "rug-setup".into(),
            condition: RuleCondition::AllOf(vec![
                RuleCondition::HasSignalKind("MINT_FUNCTION".into()),
                RuleCondition::AnyOf(vec![
                    RuleCondition::HasSignalKind("LOW_LIQUIDITY".into()),
                    RuleCondition::HasSignalKind("CONCENTRATED_LP".into()),
                ]),
            ]),
            severity: RiskLevel::High,
            message: "mintable token with fragile liquidity".into(),
            actions: vec!["notify_user".into()],
        },
        AlertRule {
            id: "high-risk".into(),
            condition: RuleCondition::LevelAtLeast(RiskLevel::High),
            severity: RiskLevel::High,
            message: "high contract risk".into(),
            actions: vec!["notify_user".into()],
        },
    ]
}

/// Assemble the contract engine with the standard detector set.
pub fn build(
    config: EngineConfig,
    feeds: Vec<Arc<dyn IntelFeed>>,
) -> EngineResult<Engine<ContractSnapshot>> {
    let mut registry = DetectorRegistry::new();
    registry.register(Arc::new(CentralizedControlDetector));
    registry.register(Arc::new(HolderDistributionDetector));
    registry.register(Arc::new(LiquidityDetector));
    if !feeds.is_empty() {
        registry.register(Arc::new(ExternalIntelDetector::new(
            feeds,
            IntelCache::default(),
        )));
    }
    Engine::new("contract", config, registry)
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
        assert_eq!(engine.name(), "contract");
    }
}
