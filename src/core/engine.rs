//! Assessment engine - ties detectors, aggregator, filter, classifier and
//! alert rules into one pipeline
//!
//! One engine instance serves one profile (transaction, contract, social).
//! Construction validates the whole configuration up front; a malformed
//! profile never serves a single assessment.

use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use tracing::info;

use crate::core::aggregator::SignalAggregator;
use crate::core::classifier::Classifier;
use crate::core::fp_filter::FalsePositiveFilter;
use crate::core::rules::{AlertRuleEvaluator, RuleFacts};
use crate::detectors::DetectorRegistry;
use crate::models::config::EngineConfig;
use crate::models::errors::EngineResult;
use crate::models::input::Assessable;
use crate::models::verdict::{recommendations_for, RiskLevel, ThreatAssessment};

/// Confidence floor when no detector produced a single signal.
const EMPTY_SET_CONFIDENCE: f64 = 0.3;

pub struct Engine<I: Assessable> {
    name: &'static str,
    config: EngineConfig,
    registry: DetectorRegistry<I>,
    aggregator: SignalAggregator,
    classifier: Classifier,
    fp_filter: FalsePositiveFilter,
    rule_evaluator: AlertRuleEvaluator,
}

impl<I: Assessable> Engine<I> {
    /// Build an engine from a validated configuration and a detector set.
    pub fn new(
        name: &'static str,
        config: EngineConfig,
        registry: DetectorRegistry<I>,
    ) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            aggregator: SignalAggregator::new(config.scale, config.multipliers.clone()),
            classifier: Classifier::new(config.thresholds),
            fp_filter: FalsePositiveFilter::new(config.false_positive.clone()),
            rule_evaluator: AlertRuleEvaluator::new(config.rules.clone()),
            name,
            config,
            registry,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the full pipeline with the configured per-detector timeout.
    pub async fn assess(&self, input: &I) -> EngineResult<ThreatAssessment> {
        self.assess_with_deadline(input, self.config.detector_timeout())
            .await
    }

    /// Run the full pipeline, capping per-detector time at the smaller of
    /// the configured timeout and `deadline`. Slow or dead detectors drop
    /// out individually; the verdict carries the coverage penalty in its
    /// confidence instead of blocking.
    pub async fn assess_with_deadline(
        &self,
        input: &I,
        deadline: Duration,
    ) -> EngineResult<ThreatAssessment> {
        input.validate()?;

        let started = Instant::now();
        let per_detector = self.config.detector_timeout().min(deadline);
        let (signals, traces) = self.registry.run_all(input, per_detector).await;

        let outcome = self.aggregator.aggregate(&signals);
        let context = input.context();
        let adjustment = self.fp_filter.apply(&signals, &context, outcome.raw);

        let score = self
            .config
            .scale
            .clamp(outcome.raw - adjustment.dampening);

        // A hard-override signal pins the level regardless of the numeric
        // score; unlimited approvals are never argued down.
        let level = if signals.has_hard_override() {
            RiskLevel::Critical
        } else {
            self.classifier.classify(score)
        };

        let triggers = self.rule_evaluator.evaluate(&RuleFacts {
            score,
            level,
            signals: &signals,
        });

        let confidence = self.confidence(&signals, &traces) * adjustment.confidence;
        let recommendations = recommendations_for(level, confidence);
        let latency_ms = started.elapsed().as_millis() as u64;

        info!(
            engine = self.name,
            subject = %input.subject(),
            score = %format!("{:.1}", score),
            level = level.as_str(),
            signals = signals.len(),
            triggers = triggers.len(),
            latency_ms,
            "assessment complete"
        );

        Ok(ThreatAssessment {
            subject: input.subject(),
            score,
            display_score: score.round().max(0.0) as u32,
            level,
            signals,
            false_positive: adjustment,
            triggers,
            recommendations,
            confidence,
            detector_trace: traces,
            latency_ms,
            timestamp: Utc::now().timestamp() as u64,
        })
    }

    /// Verdict confidence before the false-positive factor: grows with the
    /// number of corroborating signals, shrinks proportionally with
    /// detector coverage.
    fn confidence(
        &self,
        signals: &crate::models::signal::SignalSet,
        traces: &[crate::models::verdict::DetectorTrace],
    ) -> f64 {
        let base = if signals.is_empty() {
            EMPTY_SET_CONFIDENCE
        } else {
            (0.45 + 0.1 * signals.len().min(5) as f64).min(0.95)
        };
        let coverage = if traces.is_empty() {
            1.0
        } else {
            let completed = traces.iter().filter(|t| !t.is_unavailable()).count();
            completed as f64 / traces.len() as f64
        };
        base * coverage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::{AlertRule, RuleCondition};
    use crate::detectors::Detector;
    use crate::models::config::{
        CategoryMultiplierTable, FalsePositiveConfig, LevelThresholds, ScoreScale,
    };
    use crate::models::input::TxDescriptor;
    use crate::models::signal::{Signal, SignalCategory};
    use alloy_primitives::{Address, B256, U256};
    use chrono::{TimeZone, Utc};
    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Arc;

    struct FixedDetector(Vec<Signal>);

    impl Detector<TxDescriptor> for FixedDetector {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn detect<'a>(
            &'a self,
            _input: &'a TxDescriptor,
        ) -> BoxFuture<'a, eyre::Result<Vec<Signal>>> {
            let signals = self.0.clone();
            async move { Ok(signals) }.boxed()
        }
    }

    fn config() -> EngineConfig {
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
            multipliers: CategoryMultiplierTable::default(),
            false_positive: FalsePositiveConfig::default(),
            rules: vec![AlertRule {
                id: "critical-threat".into(),
                condition: RuleCondition::LevelAtLeast(RiskLevel::Critical),
                severity: RiskLevel::Critical,
                message: "critical threat".into(),
                actions: vec!["notify_user".into()],
            }],
            detector_timeout_ms: 500,
        }
    }

    fn tx() -> TxDescriptor {
        TxDescriptor {
            hash: B256::repeat_byte(0xcd),
            from: Address::repeat_byte(0x11),
            to: Some(Address::repeat_byte(0x22)),
            selector: None,
            decoded_params: BTreeMap::new(),
            value: U256::ZERO,
            gas_price_gwei: 20,
            gas_limit: 21_000,
            input_len: 0,
            observed_at: Utc.with_ymd_and_hms(2026, 1, 15, 3, 0, 0).unwrap(),
        }
    }

    fn engine_with(signals: Vec<Signal>, config: EngineConfig) -> Engine<TxDescriptor> {
        let mut registry = DetectorRegistry::new();
        registry.register(Arc::new(FixedDetector(signals)));
        Engine::new("test", config, registry).unwrap()
    }

    #[tokio::test]
    async fn empty_signal_set_is_minimal() {
        let engine = engine_with(vec![], config());
        let verdict = engine.assess(&tx()).await.unwrap();
        assert_eq!(verdict.score, 0.0);
        assert_eq!(verdict.level, RiskLevel::Minimal);
        assert!(verdict.triggers.is_empty());
        assert!((verdict.confidence - EMPTY_SET_CONFIDENCE).abs() < 1e-9);
    }

    #[tokio::test]
    async fn hard_override_pins_critical_and_fires_rules() {
        let engine = engine_with(
            vec![Signal::new(
                SignalCategory::Approval,
                "UNLIMITED_APPROVAL",
                85.0,
                1.0,
                "unlimited",
                "t",
            )
            .with_hard_override()],
            config(),
        );
        let verdict = engine.assess(&tx()).await.unwrap();
        assert_eq!(verdict.level, RiskLevel::Critical);
        assert_eq!(verdict.triggers.len(), 1);
        assert_eq!(verdict.triggers[0].rule_id, "critical-threat");
    }

    #[tokio::test]
    async fn allowlisted_counterparty_dampens_but_is_capped() {
        let mut cfg = config();
        cfg.false_positive.allowlist =
            HashSet::from([Address::repeat_byte(0x22)]);
        cfg.false_positive.allowlist_dampening = 50.0;

        let engine = engine_with(
            vec![Signal::new(
                SignalCategory::Transfer,
                "LARGE_VALUE",
                40.0,
                1.0,
                "t",
                "t",
            )],
            cfg,
        );
        let verdict = engine.assess(&tx()).await.unwrap();
        assert_eq!(
            verdict.false_positive.applied_filters,
            vec!["known_good_counterparty"]
        );
        // Cap: dampening <= 0.5 * raw (40), so score is exactly half.
        assert!((verdict.score - 20.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn invalid_input_yields_typed_error_not_verdict() {
        let engine = engine_with(vec![], config());
        let mut bad = tx();
        bad.input_len = 2;
        let err = engine.assess(&bad).await.unwrap_err();
        assert_eq!(err.code_str(), "INPUT_INVALID_CALLDATA");
    }

    #[tokio::test]
    async fn malformed_config_is_rejected_at_construction() {
        let mut cfg = config();
        cfg.thresholds.critical = 10.0;
        let registry: DetectorRegistry<TxDescriptor> = DetectorRegistry::new();
        assert!(Engine::new("test", cfg, registry).is_err());
    }

    #[tokio::test]
    async fn identical_inputs_produce_identical_verdicts() {
        let engine = engine_with(
            vec![Signal::new(
                SignalCategory::Ownership,
                "MINT_FUNCTION",
                25.0,
                0.9,
                "t",
                "t",
            )],
            config(),
        );
        let a = engine.assess(&tx()).await.unwrap();
        let b = engine.assess(&tx()).await.unwrap();
        assert_eq!(a.score, b.score);
        assert_eq!(a.level, b.level);
        assert_eq!(a.false_positive.dampening, b.false_positive.dampening);
    }
}
