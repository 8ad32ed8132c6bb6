//! Engine configuration
//!
//! Supplied once at construction, validated up front, read-only for the
//! lifetime of the engine. A malformed table or rule is fatal: the engine
//! refuses to serve assessments rather than silently skip configuration.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::core::rules::AlertRule;
use crate::models::errors::{EngineError, EngineResult};
use crate::models::signal::SignalCategory;

/// The numeric scale one engine instantiation scores on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreScale {
    pub min: f64,
    pub max: f64,
    /// Anti-amplification safeguard: when no single signal's effective
    /// weight reaches this ceiling, the aggregated total is clamped to it.
    /// Many independently-trivial signals cannot synthesize a CRITICAL.
    pub low_severity_ceiling: f64,
}

impl ScoreScale {
    pub fn validate(&self) -> EngineResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(EngineError::invalid_scale(format!(
                "scale min {} must be below max {}",
                self.min, self.max
            )));
        }
        if self.low_severity_ceiling <= self.min || self.low_severity_ceiling > self.max {
            return Err(EngineError::invalid_scale(format!(
                "low_severity_ceiling {} outside ({}, {}]",
                self.low_severity_ceiling, self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn clamp(&self, score: f64) -> f64 {
        score.clamp(self.min, self.max)
    }
}

/// Fixed, non-overlapping classifier thresholds. Scores at or above
/// `critical` classify CRITICAL, and so on down; below `low` is MINIMAL.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelThresholds {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl LevelThresholds {
    pub fn validate(&self, scale: &ScoreScale) -> EngineResult<()> {
        let ordered = self.critical > self.high && self.high > self.medium && self.medium > self.low;
        if !ordered {
            return Err(EngineError::invalid_thresholds(
                "thresholds must be strictly descending: critical > high > medium > low",
            ));
        }
        if self.low <= scale.min || self.critical > scale.max {
            return Err(EngineError::invalid_thresholds(format!(
                "thresholds [{}, {}] must sit inside the scale ({}, {}]",
                self.low, self.critical, scale.min, scale.max
            )));
        }
        Ok(())
    }
}

/// Occurrence requirement for one multiplier rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: SignalCategory,
    pub min_count: usize,
}

/// One amplification rule: when every category requirement is met, the
/// running total is multiplied by `factor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiplierRule {
    pub label: String,
    pub requires: Vec<CategoryCount>,
    pub factor: f64,
}

/// Cross-category multiplier table. Evaluated once per aggregation, in
/// declaration order, composing multiplicatively. Multipliers only ever
/// amplify; reduction is the false-positive filter's job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryMultiplierTable {
    pub rules: Vec<MultiplierRule>,
}

impl CategoryMultiplierTable {
    pub fn validate(&self) -> EngineResult<()> {
        for rule in &self.rules {
            if rule.factor <= 1.0 || !rule.factor.is_finite() {
                return Err(EngineError::invalid_multiplier(format!(
                    "multiplier '{}' has factor {} (must be > 1.0)",
                    rule.label, rule.factor
                )));
            }
            if rule.requires.is_empty() {
                return Err(EngineError::invalid_multiplier(format!(
                    "multiplier '{}' has an empty occurrence predicate",
                    rule.label
                )));
            }
            if rule.requires.iter().any(|r| r.min_count == 0) {
                return Err(EngineError::invalid_multiplier(format!(
                    "multiplier '{}' requires a min_count of at least 1",
                    rule.label
                )));
            }
        }
        Ok(())
    }
}

/// False-positive filter configuration. Each filter that matches contributes
/// its fixed dampening amount; the summed total is capped at
/// `max_dampening_ratio` of the raw score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FalsePositiveConfig {
    /// Known-good counterparties.
    pub allowlist: HashSet<Address>,
    pub allowlist_dampening: f64,
    /// Selectors of canonical, widely-used operations (hex, e.g. "0xa9059cbb").
    pub canonical_selectors: HashSet<String>,
    pub canonical_dampening: f64,
    /// Inclusive UTC hour window considered low-risk, e.g. (8, 18).
    pub low_risk_hours_utc: Option<(u8, u8)>,
    pub low_risk_window_dampening: f64,
    /// Signal kinds previously corrected as false positives by operators.
    pub corrected_kinds: HashSet<String>,
    pub corrected_dampening: f64,
    /// Cap on total dampening, as a fraction of the raw score. A filter can
    /// reduce confidence in a verdict but can never erase a high-severity
    /// signal: allow-list abuse must not mask real attacks.
    pub max_dampening_ratio: f64,
}

impl Default for FalsePositiveConfig {
    fn default() -> Self {
        Self {
            allowlist: HashSet::new(),
            allowlist_dampening: 15.0,
            canonical_selectors: HashSet::new(),
            canonical_dampening: 10.0,
            low_risk_hours_utc: None,
            low_risk_window_dampening: 5.0,
            corrected_kinds: HashSet::new(),
            corrected_dampening: 10.0,
            max_dampening_ratio: 0.5,
        }
    }
}

impl FalsePositiveConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&self.max_dampening_ratio) {
            return Err(EngineError::invalid_filter(format!(
                "max_dampening_ratio {} outside [0, 1]",
                self.max_dampening_ratio
            )));
        }
        for (name, amount) in [
            ("allowlist_dampening", self.allowlist_dampening),
            ("canonical_dampening", self.canonical_dampening),
            ("low_risk_window_dampening", self.low_risk_window_dampening),
            ("corrected_dampening", self.corrected_dampening),
        ] {
            if amount < 0.0 || !amount.is_finite() {
                return Err(EngineError::invalid_filter(format!(
                    "{} must be non-negative, got {}",
                    name, amount
                )));
            }
        }
        if let Some((start, end)) = self.low_risk_hours_utc {
            if start > 23 || end > 23 {
                return Err(EngineError::invalid_filter(format!(
                    "low_risk_hours_utc ({}, {}) outside 0-23",
                    start, end
                )));
            }
        }
        Ok(())
    }
}

/// Complete configuration for one engine instantiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub scale: ScoreScale,
    pub thresholds: LevelThresholds,
    pub multipliers: CategoryMultiplierTable,
    pub false_positive: FalsePositiveConfig,
    pub rules: Vec<AlertRule>,
    /// Per-detector timeout in milliseconds.
    pub detector_timeout_ms: u64,
}

impl EngineConfig {
    pub fn detector_timeout(&self) -> Duration {
        Duration::from_millis(self.detector_timeout_ms)
    }

    /// Validate the whole configuration. Any failure is fatal at startup.
    pub fn validate(&self) -> EngineResult<()> {
        self.scale.validate()?;
        self.thresholds.validate(&self.scale)?;
        self.multipliers.validate()?;
        self.false_positive.validate()?;
        for rule in &self.rules {
            rule.validate()?;
        }
        if self.detector_timeout_ms == 0 {
            return Err(EngineError::invalid_filter("detector_timeout_ms must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> ScoreScale {
        ScoreScale {
            min: 0.0,
            max: 100.0,
            low_severity_ceiling: 25.0,
        }
    }

    #[test]
    fn scale_rejects_inverted_bounds() {
        let s = ScoreScale {
            min: 100.0,
            max: 0.0,
            low_severity_ceiling: 25.0,
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn thresholds_must_descend() {
        let t = LevelThresholds {
            critical: 60.0,
            high: 80.0,
            medium: 40.0,
            low: 20.0,
        };
        assert!(t.validate(&scale()).is_err());
    }

    #[test]
    fn multiplier_factor_must_amplify() {
        let table = CategoryMultiplierTable {
            rules: vec![MultiplierRule {
                label: "bad".into(),
                requires: vec![CategoryCount {
                    category: SignalCategory::Ownership,
                    min_count: 2,
                }],
                factor: 0.8,
            }],
        };
        assert!(table.validate().is_err());
    }

    #[test]
    fn fp_ratio_bounded() {
        let fp = FalsePositiveConfig {
            max_dampening_ratio: 1.5,
            ..Default::default()
        };
        assert!(fp.validate().is_err());
    }
}
