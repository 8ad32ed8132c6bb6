//! Signal aggregation - one algorithm shared by every profile
//!
//! Sum of confidence-weighted signal weights, amplified by the configured
//! cross-category multiplier table, then clamped twice: first by the
//! anti-amplification ceiling (a crowd of trivial signals cannot fake a
//! critical), then to the profile's scale.

use tracing::debug;

use crate::models::config::{CategoryMultiplierTable, ScoreScale};
use crate::models::signal::SignalSet;

/// Full breakdown of one aggregation, kept for the audit trail.
#[derive(Debug, Clone)]
pub struct AggregateOutcome {
    /// Pre-multiplier sum of effective weights.
    pub base: f64,
    /// Final aggregated score after multipliers and clamps. Input to the
    /// false-positive filter.
    pub raw: f64,
    /// Labels of the multiplier rules that fired, in declaration order.
    pub multipliers_applied: Vec<String>,
    /// True when the anti-amplification ceiling cut the total down.
    pub clamped_by_ceiling: bool,
}

/// Stateless per-call aggregator. Same signal set, same table, same scale
/// always yields the same outcome.
#[derive(Debug, Clone)]
pub struct SignalAggregator {
    scale: ScoreScale,
    multipliers: CategoryMultiplierTable,
}

impl SignalAggregator {
    pub fn new(scale: ScoreScale, multipliers: CategoryMultiplierTable) -> Self {
        Self { scale, multipliers }
    }

    pub fn aggregate(&self, signals: &SignalSet) -> AggregateOutcome {
        if signals.is_empty() {
            return AggregateOutcome {
                base: self.scale.min,
                raw: self.scale.min,
                multipliers_applied: Vec::new(),
                clamped_by_ceiling: false,
            };
        }

        let base: f64 = signals.iter().map(|s| s.effective_weight()).sum();
        let mut total = base;
        let mut applied = Vec::new();

        // Multipliers only amplify real risk; they never turn a clean
        // (non-positive) total into a risky one.
        let counts = signals.category_counts();
        for rule in &self.multipliers.rules {
            if total <= 0.0 {
                break;
            }
            let met = rule
                .requires
                .iter()
                .all(|req| counts.get(&req.category).copied().unwrap_or(0) >= req.min_count);
            if met {
                debug!(multiplier = %rule.label, factor = rule.factor, "multiplier applied");
                total *= rule.factor;
                applied.push(rule.label.clone());
            }
        }

        // Anti-amplification: if no single signal is individually serious,
        // the pile of them stays below the ceiling.
        let mut clamped_by_ceiling = false;
        if signals.max_positive_effective_weight() < self.scale.low_severity_ceiling
            && total > self.scale.low_severity_ceiling
        {
            total = self.scale.low_severity_ceiling;
            clamped_by_ceiling = true;
        }

        AggregateOutcome {
            base,
            raw: self.scale.clamp(total),
            multipliers_applied: applied,
            clamped_by_ceiling,
        }
    }
}
