//! False-positive filter - bounded, auditable dampening
//!
//! Each matching heuristic contributes a fixed dampening amount; the sum is
//! capped at a configured fraction of the raw score so the filter can soften
//! a verdict but never erase one. Hard-override signals bypass the filter
//! entirely.

use tracing::debug;

use crate::models::config::FalsePositiveConfig;
use crate::models::input::AssessmentContext;
use crate::models::signal::SignalSet;
use crate::models::verdict::FalsePositiveAdjustment;

use chrono::Timelike;

#[derive(Debug, Clone)]
pub struct FalsePositiveFilter {
    config: FalsePositiveConfig,
}

impl FalsePositiveFilter {
    pub fn new(config: FalsePositiveConfig) -> Self {
        Self { config }
    }

    /// Evaluate every filter against one assessment. `raw` is the aggregated
    /// pre-filter score; filters that match are always recorded in the audit
    /// trail, even when the cap (or a zero raw score) leaves nothing to
    /// subtract.
    pub fn apply(
        &self,
        signals: &SignalSet,
        context: &AssessmentContext,
        raw: f64,
    ) -> FalsePositiveAdjustment {
        if signals.has_hard_override() {
            debug!("hard-override signal present, skipping false-positive filters");
            return FalsePositiveAdjustment::none();
        }

        let mut applied = Vec::new();
        let mut requested = 0.0;

        if let Some(counterparty) = context.counterparty {
            if self.config.allowlist.contains(&counterparty) {
                applied.push("known_good_counterparty".to_string());
                requested += self.config.allowlist_dampening;
            }
        }

        if let Some(selector) = context.selector {
            let hex_selector = format!("0x{}", hex::encode(selector));
            if self.config.canonical_selectors.contains(&hex_selector) {
                applied.push("canonical_operation".to_string());
                requested += self.config.canonical_dampening;
            }
        }

        if let Some((start, end)) = self.config.low_risk_hours_utc {
            let hour = context.observed_at.hour() as u8;
            let in_window = if start <= end {
                (start..=end).contains(&hour)
            } else {
                // Window wraps midnight, e.g. (22, 6).
                hour >= start || hour <= end
            };
            if in_window {
                applied.push("low_risk_window".to_string());
                requested += self.config.low_risk_window_dampening;
            }
        }

        if signals
            .iter()
            .any(|s| self.config.corrected_kinds.contains(&s.kind))
        {
            applied.push("prior_correction".to_string());
            requested += self.config.corrected_dampening;
        }

        if applied.is_empty() {
            return FalsePositiveAdjustment::none();
        }

        let cap = self.config.max_dampening_ratio * raw.max(0.0);
        let dampening = requested.min(cap);
        let confidence = (1.0 - 0.05 * applied.len() as f64).max(0.7);

        debug!(
            filters = ?applied,
            requested,
            dampening,
            "false-positive filters applied"
        );

        FalsePositiveAdjustment {
            applied_filters: applied,
            dampening,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::signal::{Signal, SignalCategory};
    use alloy_primitives::Address;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    fn context(counterparty: Option<Address>, selector: Option<[u8; 4]>) -> AssessmentContext {
        AssessmentContext {
            counterparty,
            selector,
            observed_at: Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
        }
    }

    fn sig(kind: &str, weight: f64) -> Signal {
        Signal::new(SignalCategory::Transfer, kind, weight, 1.0, "t", "t")
    }

    #[test]
    fn dampening_never_exceeds_half_the_raw_score() {
        let trusted = Address::repeat_byte(0xaa);
        let mut allowlist = HashSet::new();
        allowlist.insert(trusted);
        let filter = FalsePositiveFilter::new(FalsePositiveConfig {
            allowlist,
            allowlist_dampening: 40.0,
            ..Default::default()
        });

        let signals = SignalSet::from_vec(vec![sig("X", 30.0)]);
        let adj = filter.apply(&signals, &context(Some(trusted), None), 30.0);
        assert_eq!(adj.applied_filters, vec!["known_good_counterparty"]);
        assert!((adj.dampening - 15.0).abs() < 1e-9);
    }

    #[test]
    fn filters_recorded_even_at_zero_raw() {
        let trusted = Address::repeat_byte(0xaa);
        let mut allowlist = HashSet::new();
        allowlist.insert(trusted);
        let filter = FalsePositiveFilter::new(FalsePositiveConfig {
            allowlist,
            ..Default::default()
        });

        let adj = filter.apply(&SignalSet::new(), &context(Some(trusted), None), 0.0);
        assert_eq!(adj.applied_filters, vec!["known_good_counterparty"]);
        assert_eq!(adj.dampening, 0.0);
    }

    #[test]
    fn hard_override_bypasses_all_filters() {
        let trusted = Address::repeat_byte(0xaa);
        let mut allowlist = HashSet::new();
        allowlist.insert(trusted);
        let filter = FalsePositiveFilter::new(FalsePositiveConfig {
            allowlist,
            ..Default::default()
        });

        let signals =
            SignalSet::from_vec(vec![sig("UNLIMITED_APPROVAL", 85.0).with_hard_override()]);
        let adj = filter.apply(&signals, &context(Some(trusted), None), 85.0);
        assert!(adj.applied_filters.is_empty());
        assert_eq!(adj.dampening, 0.0);
        assert_eq!(adj.confidence, 1.0);
    }

    #[test]
    fn canonical_selector_and_window_stack() {
        let mut canonical = HashSet::new();
        canonical.insert("0xa9059cbb".to_string());
        let filter = FalsePositiveFilter::new(FalsePositiveConfig {
            canonical_selectors: canonical,
            low_risk_hours_utc: Some((8, 18)),
            ..Default::default()
        });

        let signals = SignalSet::from_vec(vec![sig("TRANSFER", 40.0)]);
        let adj = filter.apply(
            &signals,
            &context(None, Some([0xa9, 0x05, 0x9c, 0xbb])),
            40.0,
        );
        assert_eq!(
            adj.applied_filters,
            vec!["canonical_operation", "low_risk_window"]
        );
        assert!((adj.dampening - 15.0).abs() < 1e-9);
        assert!((adj.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn midnight_wrapping_window() {
        let filter = FalsePositiveFilter::new(FalsePositiveConfig {
            low_risk_hours_utc: Some((22, 6)),
            low_risk_window_dampening: 5.0,
            ..Default::default()
        });
        let ctx = AssessmentContext {
            counterparty: None,
            selector: None,
            observed_at: Utc.with_ymd_and_hms(2026, 1, 15, 23, 0, 0).unwrap(),
        };
        let signals = SignalSet::from_vec(vec![sig("X", 40.0)]);
        let adj = filter.apply(&signals, &ctx, 40.0);
        assert_eq!(adj.applied_filters, vec!["low_risk_window"]);
    }

    #[test]
    fn prior_correction_matches_signal_kind() {
        let mut corrected = HashSet::new();
        corrected.insert("ELEVATED_GAS_PRICE".to_string());
        let filter = FalsePositiveFilter::new(FalsePositiveConfig {
            corrected_kinds: corrected,
            ..Default::default()
        });
        let signals = SignalSet::from_vec(vec![sig("ELEVATED_GAS_PRICE", 20.0)]);
        let adj = filter.apply(&signals, &context(None, None), 20.0);
        assert_eq!(adj.applied_filters, vec!["prior_correction"]);
    }
}
