//! Signal types - the atomic unit of observation
//!
//! A Signal is one typed, weighted observation emitted by a detector about
//! one subject. Signals are grouped by category so the aggregator can apply
//! cross-category multipliers without double-counting correlated factors.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category a signal belongs to. Categories group correlated factors for
/// the aggregator's multiplier logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalCategory {
    Ownership,
    Approval,
    Transfer,
    Liquidity,
    ExternalIntel,
    Sentiment,
    ValueGas,
    Identity,
}

impl SignalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalCategory::Ownership => "OWNERSHIP",
            SignalCategory::Approval => "APPROVAL",
            SignalCategory::Transfer => "TRANSFER",
            SignalCategory::Liquidity => "LIQUIDITY",
            SignalCategory::ExternalIntel => "EXTERNAL_INTEL",
            SignalCategory::Sentiment => "SENTIMENT",
            SignalCategory::ValueGas => "VALUE_GAS",
            SignalCategory::Identity => "IDENTITY",
        }
    }
}

/// Static risk tier for table-driven detectors (method-signature table).
/// Tiers map to base weights on the 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    /// Base contribution on the 0-100 scale.
    pub fn base_weight(&self) -> f64 {
        match self {
            RiskTier::Low => 12.0,
            RiskTier::Medium => 30.0,
            RiskTier::High => 55.0,
            RiskTier::Critical => 85.0,
        }
    }
}

/// One typed observation from a single detector.
///
/// `weight` is on the owning profile's scale; negative weights are legal and
/// represent risk-reducing evidence (e.g. a verified identity hit).
/// A signal with confidence 0 stays in the audit trail but contributes 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub category: SignalCategory,
    /// Stable identifier, e.g. `UNLIMITED_APPROVAL`.
    pub kind: String,
    pub weight: f64,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// Human-readable description for display / audit trail.
    pub description: String,
    /// Name of the detector that produced this signal.
    pub source: String,
    /// Hard overrides force the final level to Critical and are exempt from
    /// false-positive dampening. Only unconditionally-dangerous findings
    /// (unlimited approvals) set this.
    #[serde(default)]
    pub hard_override: bool,
}

impl Signal {
    pub fn new(
        category: SignalCategory,
        kind: impl Into<String>,
        weight: f64,
        confidence: f64,
        description: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            category,
            kind: kind.into(),
            weight,
            confidence: confidence.clamp(0.0, 1.0),
            description: description.into(),
            source: source.into(),
            hard_override: false,
        }
    }

    /// Mark this signal as a hard override (forces Critical).
    pub fn with_hard_override(mut self) -> Self {
        self.hard_override = true;
        self
    }

    /// Confidence-weighted contribution to the raw score.
    pub fn effective_weight(&self) -> f64 {
        self.weight * self.confidence
    }
}

/// Ordered list of signals for one subject. Insertion order is irrelevant
/// to scoring but preserved for audit display. Treated as immutable once
/// handed to the aggregator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalSet {
    signals: Vec<Signal>,
}

impl SignalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(signals: Vec<Signal>) -> Self {
        Self { signals }
    }

    pub fn push(&mut self, signal: Signal) {
        self.signals.push(signal);
    }

    pub fn extend(&mut self, signals: Vec<Signal>) {
        self.signals.extend(signals);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.signals.iter().any(|s| s.kind == kind)
    }

    pub fn has_hard_override(&self) -> bool {
        self.signals.iter().any(|s| s.hard_override)
    }

    /// Occurrence counts per category, counting only signals with a positive
    /// effective weight. Risk-reducing signals never trip an amplifier.
    pub fn category_counts(&self) -> HashMap<SignalCategory, usize> {
        let mut counts = HashMap::new();
        for s in &self.signals {
            if s.effective_weight() > 0.0 {
                *counts.entry(s.category).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Largest single positive effective weight, or 0.0 when none.
    pub fn max_positive_effective_weight(&self) -> f64 {
        self.signals
            .iter()
            .map(|s| s.effective_weight())
            .filter(|w| *w > 0.0)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(category: SignalCategory, kind: &str, weight: f64, confidence: f64) -> Signal {
        Signal::new(category, kind, weight, confidence, "test", "test_detector")
    }

    #[test]
    fn confidence_is_clamped() {
        let s = sig(SignalCategory::ValueGas, "X", 10.0, 1.5);
        assert_eq!(s.confidence, 1.0);
        let s = sig(SignalCategory::ValueGas, "X", 10.0, -0.5);
        assert_eq!(s.confidence, 0.0);
    }

    #[test]
    fn zero_confidence_contributes_nothing() {
        let s = sig(SignalCategory::Approval, "X", 50.0, 0.0);
        assert_eq!(s.effective_weight(), 0.0);
    }

    #[test]
    fn category_counts_skip_negative_and_zero() {
        let set = SignalSet::from_vec(vec![
            sig(SignalCategory::Ownership, "A", 30.0, 1.0),
            sig(SignalCategory::Ownership, "B", 30.0, 0.5),
            sig(SignalCategory::Identity, "VERIFIED", -20.0, 1.0),
            sig(SignalCategory::Ownership, "C", 30.0, 0.0),
        ]);
        let counts = set.category_counts();
        assert_eq!(counts.get(&SignalCategory::Ownership), Some(&2));
        assert_eq!(counts.get(&SignalCategory::Identity), None);
    }

    #[test]
    fn max_positive_effective_weight_ignores_reducers() {
        let set = SignalSet::from_vec(vec![
            sig(SignalCategory::Identity, "VERIFIED", -50.0, 1.0),
            sig(SignalCategory::ValueGas, "LARGE_VALUE", 25.0, 0.8),
        ]);
        assert!((set.max_positive_effective_weight() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn hard_override_detection() {
        let mut set = SignalSet::new();
        assert!(!set.has_hard_override());
        set.push(
            sig(SignalCategory::Approval, "UNLIMITED_APPROVAL", 85.0, 1.0).with_hard_override(),
        );
        assert!(set.has_hard_override());
    }
}
