//! Detector Module - pluggable signal sources
//!
//! A detector is a pure function of one typed input plus read-only
//! configuration, emitting zero or more signals. Absence of a signal is the
//! normal case, never an error. Detectors run concurrently, each bounded by
//! an individual timeout; one detector's failure never blocks another's
//! contribution.

pub mod external_intel;
pub mod method_signature;
pub mod sentiment;
pub mod tokenomics;
pub mod value_gas;

pub use external_intel::*;
pub use method_signature::*;
pub use sentiment::*;
pub use tokenomics::*;
pub use value_gas::*;

use futures_util::future::BoxFuture;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::models::input::Assessable;
use crate::models::signal::{Signal, SignalSet};
use crate::models::verdict::{DetectorStatus, DetectorTrace};

/// A pluggable signal source for one input type.
pub trait Detector<I>: Send + Sync {
    fn name(&self) -> &'static str;
    /// Inspect the input and emit zero or more signals. Errors are absorbed
    /// by the registry as `Unavailable`; they never abort the assessment.
    fn detect<'a>(&'a self, input: &'a I) -> BoxFuture<'a, eyre::Result<Vec<Signal>>>;
}

/// Holds the detectors applicable to one input type and runs them all,
/// concurrently, for one assessment.
pub struct DetectorRegistry<I> {
    detectors: Vec<Arc<dyn Detector<I>>>,
}

impl<I> Default for DetectorRegistry<I> {
    fn default() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }
}

impl<I: Assessable> DetectorRegistry<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, detector: Arc<dyn Detector<I>>) {
        self.detectors.push(detector);
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Fan out all detectors against one input. Each runs in its own task
    /// under `per_detector_timeout`; a timeout, error, or panic yields an
    /// `Unavailable` trace entry and no signals. Signals are collected in
    /// detector registration order, so identical inputs produce identical
    /// signal sets.
    pub async fn run_all(
        &self,
        input: &I,
        per_detector_timeout: Duration,
    ) -> (SignalSet, Vec<DetectorTrace>) {
        let mut handles = Vec::with_capacity(self.detectors.len());

        for detector in &self.detectors {
            let name = detector.name();
            let detector = Arc::clone(detector);
            let input = input.clone();
            let handle = tokio::spawn(async move {
                let start = Instant::now();
                let outcome =
                    tokio::time::timeout(per_detector_timeout, detector.detect(&input)).await;
                (outcome, start.elapsed().as_millis() as u64)
            });
            handles.push((name, handle));
        }

        let mut signals = SignalSet::new();
        let mut traces = Vec::with_capacity(handles.len());

        for (name, handle) in handles {
            match handle.await {
                Ok((Ok(Ok(found)), elapsed_ms)) => {
                    debug!(detector = name, signals = found.len(), "detector completed");
                    traces.push(DetectorTrace {
                        detector: name.to_string(),
                        status: DetectorStatus::Completed {
                            signals: found.len(),
                        },
                        elapsed_ms,
                    });
                    signals.extend(found);
                }
                Ok((Ok(Err(err)), elapsed_ms)) => {
                    warn!(detector = name, error = %err, "detector unavailable");
                    traces.push(DetectorTrace {
                        detector: name.to_string(),
                        status: DetectorStatus::Unavailable {
                            reason: err.to_string(),
                        },
                        elapsed_ms,
                    });
                }
                Ok((Err(_), elapsed_ms)) => {
                    warn!(detector = name, "detector timed out");
                    traces.push(DetectorTrace {
                        detector: name.to_string(),
                        status: DetectorStatus::Unavailable {
                            reason: "timeout".to_string(),
                        },
                        elapsed_ms,
                    });
                }
                Err(join_err) => {
                    warn!(detector = name, error = %join_err, "detector task failed");
                    traces.push(DetectorTrace {
                        detector: name.to_string(),
                        status: DetectorStatus::Unavailable {
                            reason: "panicked".to_string(),
                        },
                        elapsed_ms: 0,
                    });
                }
            }
        }

        (signals, traces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::input::SocialCorpus;
    use crate::models::signal::SignalCategory;
    use chrono::Utc;
    use futures_util::FutureExt;

    fn corpus() -> SocialCorpus {
        SocialCorpus {
            query: "testcoin".into(),
            platforms: vec![],
            observed_at: Utc::now(),
        }
    }

    struct FixedDetector;
    impl Detector<SocialCorpus> for FixedDetector {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn detect<'a>(&'a self, _: &'a SocialCorpus) -> BoxFuture<'a, eyre::Result<Vec<Signal>>> {
            async {
                Ok(vec![Signal::new(
                    SignalCategory::Sentiment,
                    "NEGATIVE_SENTIMENT",
                    3.0,
                    0.8,
                    "fixed",
                    "fixed",
                )])
            }
            .boxed()
        }
    }

    struct FailingDetector;
    impl Detector<SocialCorpus> for FailingDetector {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn detect<'a>(&'a self, _: &'a SocialCorpus) -> BoxFuture<'a, eyre::Result<Vec<Signal>>> {
            async { Err(eyre::eyre!("feed down")) }.boxed()
        }
    }

    struct SlowDetector;
    impl Detector<SocialCorpus> for SlowDetector {
        fn name(&self) -> &'static str {
            "slow"
        }
        fn detect<'a>(&'a self, _: &'a SocialCorpus) -> BoxFuture<'a, eyre::Result<Vec<Signal>>> {
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(vec![])
            }
            .boxed()
        }
    }

    struct PanickingDetector;
    impl Detector<SocialCorpus> for PanickingDetector {
        fn name(&self) -> &'static str {
            "panicking"
        }
        fn detect<'a>(&'a self, _: &'a SocialCorpus) -> BoxFuture<'a, eyre::Result<Vec<Signal>>> {
            async { panic!("boom") }.boxed()
        }
    }

    #[tokio::test]
    async fn failing_detector_does_not_block_others() {
        let mut registry = DetectorRegistry::new();
        registry.register(Arc::new(FailingDetector));
        registry.register(Arc::new(FixedDetector));

        let (signals, traces) = registry
            .run_all(&corpus(), Duration::from_millis(200))
            .await;

        assert_eq!(signals.len(), 1);
        assert_eq!(traces.len(), 2);
        assert!(traces[0].is_unavailable());
        assert!(!traces[1].is_unavailable());
    }

    #[tokio::test]
    async fn slow_detector_is_marked_unavailable() {
        let mut registry = DetectorRegistry::new();
        registry.register(Arc::new(SlowDetector));
        registry.register(Arc::new(FixedDetector));

        let (signals, traces) = registry
            .run_all(&corpus(), Duration::from_millis(50))
            .await;

        assert_eq!(signals.len(), 1);
        assert!(traces[0].is_unavailable());
    }

    #[tokio::test]
    async fn panicking_detector_is_isolated() {
        let mut registry = DetectorRegistry::new();
        registry.register(Arc::new(PanickingDetector));
        registry.register(Arc::new(FixedDetector));

        let (signals, traces) = registry
            .run_all(&corpus(), Duration::from_millis(200))
            .await;

        assert_eq!(signals.len(), 1);
        assert!(traces[0].is_unavailable());
    }
}
