//! Score-to-level classification
//!
//! Pure threshold lookup. Monotonic by construction: a higher score can
//! never classify to a lower level.

use crate::models::config::LevelThresholds;
use crate::models::verdict::RiskLevel;

#[derive(Debug, Clone)]
pub struct Classifier {
    thresholds: LevelThresholds,
}

impl Classifier {
    pub fn new(thresholds: LevelThresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, score: f64) -> RiskLevel {
        if score >= self.thresholds.critical {
            RiskLevel::Critical
        } else if score >= self.thresholds.high {
            RiskLevel::High
        } else if score >= self.thresholds.medium {
            RiskLevel::Medium
        } else if score >= self.thresholds.low {
            RiskLevel::Low
        } else {
            RiskLevel::Minimal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(LevelThresholds {
            critical: 80.0,
            high: 60.0,
            medium: 40.0,
            low: 20.0,
        })
    }

    #[test]
    fn boundaries_are_inclusive() {
        let c = classifier();
        assert_eq!(c.classify(80.0), RiskLevel::Critical);
        assert_eq!(c.classify(79.9), RiskLevel::High);
        assert_eq!(c.classify(60.0), RiskLevel::High);
        assert_eq!(c.classify(40.0), RiskLevel::Medium);
        assert_eq!(c.classify(20.0), RiskLevel::Low);
        assert_eq!(c.classify(19.9), RiskLevel::Minimal);
        assert_eq!(c.classify(0.0), RiskLevel::Minimal);
    }

    #[test]
    fn classification_is_monotonic() {
        let c = classifier();
        let mut prev = RiskLevel::Minimal;
        for step in 0..=1000 {
            let level = c.classify(step as f64 * 0.1);
            assert!(level >= prev);
            prev = level;
        }
    }
}
