//! Verdict types - the immutable output of one assessment
//!
//! A ThreatAssessment is complete the instant it is returned; a
//! re-assessment produces a new one, never an update-in-place.

use serde::{Deserialize, Serialize};

use crate::models::signal::SignalSet;

/// Discrete severity level assigned by the classifier.
/// Variant order matters: derived `Ord` gives Minimal < ... < Critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "MINIMAL",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Minimal => "✅",
            RiskLevel::Low => "🟡",
            RiskLevel::Medium => "🟠",
            RiskLevel::High => "🔴",
            RiskLevel::Critical => "💀",
        }
    }
}

/// Result of the false-positive filter pass. Produced fresh per assessment,
/// never persisted across subjects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FalsePositiveAdjustment {
    /// Names of the filters that matched, in evaluation order.
    pub applied_filters: Vec<String>,
    /// Total dampening subtracted from the raw score. Bounded: never more
    /// than the configured fraction of the raw score.
    pub dampening: f64,
    /// Confidence in the dampening itself.
    pub confidence: f64,
}

impl FalsePositiveAdjustment {
    pub fn none() -> Self {
        Self {
            applied_filters: Vec::new(),
            dampening: 0.0,
            confidence: 1.0,
        }
    }
}

/// One fired alert rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertTrigger {
    pub rule_id: String,
    pub severity: RiskLevel,
    pub message: String,
    pub actions: Vec<String>,
}

/// Outcome of one detector run within an assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DetectorStatus {
    /// Detector finished and emitted `signals` signals (possibly zero -
    /// absence of a signal is the normal case).
    Completed { signals: usize },
    /// Detector timed out or errored. It contributed nothing; the verdict's
    /// confidence carries the coverage penalty.
    Unavailable { reason: String },
}

/// Per-detector trace entry, kept so partial signal sets are explicitly
/// representable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorTrace {
    pub detector: String,
    pub status: DetectorStatus,
    pub elapsed_ms: u64,
}

impl DetectorTrace {
    pub fn is_unavailable(&self) -> bool {
        matches!(self.status, DetectorStatus::Unavailable { .. })
    }
}

/// The complete, immutable output of one assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatAssessment {
    /// Subject identifier (tx hash, contract address, search query).
    pub subject: String,
    /// Final post-filter score, unrounded. Kept for ordering and testing.
    pub score: f64,
    /// Rounded score for display.
    pub display_score: u32,
    pub level: RiskLevel,
    pub signals: SignalSet,
    pub false_positive: FalsePositiveAdjustment,
    /// Fired alert rules, in rule-declaration order (stable for dedup).
    pub triggers: Vec<AlertTrigger>,
    pub recommendations: Vec<String>,
    /// Overall confidence in [0, 1]; reduced when detector coverage was
    /// incomplete.
    pub confidence: f64,
    pub detector_trace: Vec<DetectorTrace>,
    pub latency_ms: u64,
    /// Unix timestamp of the assessment.
    pub timestamp: u64,
}

impl ThreatAssessment {
    /// Pretty print for log output.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "\n{} Risk: {} ({}) | Subject: {} | Confidence: {:.0}%\n",
            self.level.emoji(),
            self.level.as_str(),
            self.display_score,
            self.subject,
            self.confidence * 100.0
        );
        out.push_str(&format!("   Latency: {}ms\n", self.latency_ms));

        if !self.signals.is_empty() {
            out.push_str("   Signals:\n");
            for s in self.signals.iter() {
                out.push_str(&format!(
                    "     - [{}] {} (w={:+.1}, c={:.2}): {}\n",
                    s.category.as_str(),
                    s.kind,
                    s.weight,
                    s.confidence,
                    s.description
                ));
            }
        }

        if !self.false_positive.applied_filters.is_empty() {
            out.push_str(&format!(
                "   Filters: {} (dampening -{:.1})\n",
                self.false_positive.applied_filters.join(", "),
                self.false_positive.dampening
            ));
        }

        for t in &self.triggers {
            out.push_str(&format!(
                "   🔔 [{}] {} -> {}\n",
                t.rule_id,
                t.message,
                t.actions.join(", ")
            ));
        }

        for r in &self.recommendations {
            out.push_str(&format!("   💡 {}\n", r));
        }

        out
    }
}

/// Human-readable recommendations for a level/confidence pair.
pub fn recommendations_for(level: RiskLevel, confidence: f64) -> Vec<String> {
    let mut recs = Vec::new();

    recs.push(
        match level {
            RiskLevel::Minimal => "Proceed with standard caution.",
            RiskLevel::Low => "Review details before proceeding.",
            RiskLevel::Medium => "Manual review recommended. Consider a smaller test interaction.",
            RiskLevel::High => "High probability of loss. Avoid unless you understand the risks.",
            RiskLevel::Critical => "DO NOT PROCEED. Almost certain loss of funds.",
        }
        .to_string(),
    );

    if confidence < 0.5 {
        recs.push(
            "Low confidence - one or more signal sources were unavailable; re-assess later."
                .to_string(),
        );
    }

    recs
}
