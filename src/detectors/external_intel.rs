//! External-intel detector
//!
//! Queries N independent threat-intel feeds (attack-pattern lists,
//! identity/reputation lookups, scam blocklists) concurrently, each under
//! an aggressive timeout. Feed hits contribute independent weights; a
//! verified/reputable identity hit carries a negative weight and subtracts
//! from the total. Lookups are memoized in the shared bounded cache so
//! repeated identity checks within a short window stay cheap.
//!
//! A feed that errors or times out is skipped with a warning; the detector
//! itself stays available with whatever the remaining feeds returned. The
//! whole detector only reports unavailable when every feed failed.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::detectors::Detector;
use crate::models::input::{Assessable, ContractSnapshot, TxDescriptor};
use crate::models::signal::{Signal, SignalCategory};
use crate::utils::cache::IntelCache;
use crate::utils::constants::INTEL_FEED_TIMEOUT_MS;

const DETECTOR_NAME: &str = "external_intel";

/// One hit from one feed.
#[derive(Debug, Clone)]
pub struct IntelHit {
    pub kind: String,
    pub category: SignalCategory,
    /// Negative for risk-reducing evidence (verified identity).
    pub weight: f64,
    pub confidence: f64,
    pub description: String,
}

/// A single external intelligence source. Real implementations wrap an HTTP
/// client; the engine only sees this seam.
pub trait IntelFeed: Send + Sync {
    fn name(&self) -> &'static str;
    fn lookup<'a>(&'a self, subject: &'a str) -> BoxFuture<'a, eyre::Result<Vec<IntelHit>>>;
}

pub struct ExternalIntelDetector {
    feeds: Vec<Arc<dyn IntelFeed>>,
    cache: IntelCache,
    feed_timeout: Duration,
}

impl ExternalIntelDetector {
    pub fn new(feeds: Vec<Arc<dyn IntelFeed>>, cache: IntelCache) -> Self {
        Self {
            feeds,
            cache,
            feed_timeout: Duration::from_millis(INTEL_FEED_TIMEOUT_MS),
        }
    }

    pub fn with_feed_timeout(mut self, timeout: Duration) -> Self {
        self.feed_timeout = timeout;
        self
    }

    /// Query all feeds for one subject, tolerating partial feed failure.
    async fn scan(&self, subject: &str) -> eyre::Result<Vec<Signal>> {
        if self.feeds.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(cached) = self.cache.get(subject) {
            return Ok(cached);
        }

        let queries = self.feeds.iter().map(|feed| {
            let feed = Arc::clone(feed);
            async move {
                let outcome =
                    tokio::time::timeout(self.feed_timeout, feed.lookup(subject)).await;
                (feed.name(), outcome)
            }
        });

        let results = futures_util::future::join_all(queries).await;

        let mut signals = Vec::new();
        let mut failed = 0usize;
        for (feed_name, outcome) in results {
            match outcome {
                Ok(Ok(hits)) => {
                    debug!(feed = feed_name, hits = hits.len(), "intel feed answered");
                    for hit in hits {
                        signals.push(Signal::new(
                            hit.category,
                            hit.kind,
                            hit.weight,
                            hit.confidence,
                            format!("{} ({})", hit.description, feed_name),
                            DETECTOR_NAME,
                        ));
                    }
                }
                Ok(Err(err)) => {
                    warn!(feed = feed_name, error = %err, "intel feed failed");
                    failed += 1;
                }
                Err(_) => {
                    warn!(feed = feed_name, "intel feed timed out");
                    failed += 1;
                }
            }
        }

        if failed == self.feeds.len() {
            return Err(eyre::eyre!("all {} intel feeds unavailable", failed));
        }

        self.cache.insert(subject, signals.clone());
        Ok(signals)
    }

    /// The counterparty is what reputation is about; fall back to the
    /// subject id when there is none.
    fn tx_lookup_key(tx: &TxDescriptor) -> String {
        tx.to
            .map(|a| format!("{}", a))
            .unwrap_or_else(|| tx.subject())
    }
}

impl Detector<TxDescriptor> for ExternalIntelDetector {
    fn name(&self) -> &'static str {
        DETECTOR_NAME
    }

    fn detect<'a>(&'a self, input: &'a TxDescriptor) -> BoxFuture<'a, eyre::Result<Vec<Signal>>> {
        async move {
            let key = Self::tx_lookup_key(input);
            self.scan(&key).await
        }
        .boxed()
    }
}

impl Detector<ContractSnapshot> for ExternalIntelDetector {
    fn name(&self) -> &'static str {
        DETECTOR_NAME
    }

    fn detect<'a>(
        &'a self,
        input: &'a ContractSnapshot,
    ) -> BoxFuture<'a, eyre::Result<Vec<Signal>>> {
        async move {
            let key = input.subject();
            self.scan(&key).await
        }
        .boxed()
    }
}

// ============================================
// Built-in feeds
// ============================================

/// Deterministic in-memory feed for tests and the demo binary. Maps
/// lowercase subject keys to fixed hits; no synthetic randomness anywhere.
pub struct StaticFeed {
    name: &'static str,
    hits: HashMap<String, Vec<IntelHit>>,
}

impl StaticFeed {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            hits: HashMap::new(),
        }
    }

    pub fn with_hit(mut self, subject: &str, hit: IntelHit) -> Self {
        self.hits
            .entry(subject.to_lowercase())
            .or_default()
            .push(hit);
        self
    }
}

impl IntelFeed for StaticFeed {
    fn name(&self) -> &'static str {
        self.name
    }

    fn lookup<'a>(&'a self, subject: &'a str) -> BoxFuture<'a, eyre::Result<Vec<IntelHit>>> {
        async move {
            Ok(self
                .hits
                .get(&subject.to_lowercase())
                .cloned()
                .unwrap_or_default())
        }
        .boxed()
    }
}

/// Placeholder for a feed not yet backed by real data. Always reports
/// failure so the pipeline records it as unavailable instead of inventing
/// data.
pub struct UnavailableFeed {
    name: &'static str,
}

impl UnavailableFeed {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl IntelFeed for UnavailableFeed {
    fn name(&self) -> &'static str {
        self.name
    }

    fn lookup<'a>(&'a self, _subject: &'a str) -> BoxFuture<'a, eyre::Result<Vec<IntelHit>>> {
        async move { Err(eyre::eyre!("feed {} has no backing data source", self.name)) }.boxed()
    }
}

/// Attack-pattern hit at standard weight.
pub fn attack_pattern_hit(pattern: &str) -> IntelHit {
    IntelHit {
        kind: "ATTACK_PATTERN_MATCH".into(),
        category: SignalCategory::ExternalIntel,
        weight: 45.0,
        confidence: 0.85,
        description: format!("matches known attack pattern: {}", pattern),
    }
}

/// Scam-blocklist hit.
pub fn blocklist_hit(list: &str) -> IntelHit {
    IntelHit {
        kind: "SCAM_BLOCKLIST".into(),
        category: SignalCategory::ExternalIntel,
        weight: 55.0,
        confidence: 0.95,
        description: format!("address present on blocklist: {}", list),
    }
}

///// Verified identity: risk-reducing, negative weight.
pub fn verified_identity_hit(label: &str) -> IntelHit {
    IntelHit {
        kind: "VERIFIED_IDENTITY".into(),
        category: SignalCategory::Identity,
        weight: -20.0,
        confidence: 0.9,
        description: format!("counterparty has a verified identity: {}", label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBJECT: &str = "0x2222222222222222222222222222222222222222";

    fn detector_with(feeds: Vec<Arc<dyn IntelFeed>>) -> ExternalIntelDetector {
        ExternalIntelDetector::new(feeds, IntelCache::new(16, 300))
            .with_feed_timeout(Duration::from_millis(100))
    }

    #[tokio::test]
    async fn hits_become_signals() {
        let feed = StaticFeed::new("blocklist").with_hit(SUBJECT, blocklist_hit("scamdb"));
        let det = detector_with(vec![Arc::new(feed)]);

        let signals = det.scan(SUBJECT).await.unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].kind, "SCAM_BLOCKLIST");
        assert_eq!(signals[0].source, DETECTOR_NAME);
    }

    #[tokio::test]
    async fn verified_identity_is_negative() {
        let feed = StaticFeed::new("registry").with_hit(SUBJECT, verified_identity_hit("Big DEX"));
        let det = detector_with(vec![Arc::new(feed)]);

        let signals = det.scan(SUBJECT).await.unwrap();
        assert!(signals[0].weight < 0.0);
        assert_eq!(signals[0].category, SignalCategory::Identity);
    }

    #[tokio::test]
    async fn partial_feed_failure_keeps_results() {
        let good = StaticFeed::new("good").with_hit(SUBJECT, attack_pattern_hit("flash_loan"));
        let det = detector_with(vec![
            Arc::new(UnavailableFeed::new("stub")),
            Arc::new(good),
        ]);

        let signals = det.scan(SUBJECT).await.unwrap();
        assert_eq!(signals.len(), 1);
    }

    #[tokio::test]
    async fn all_feeds_down_is_an_error() {
        let det = detector_with(vec![
            Arc::new(UnavailableFeed::new("a")),
            Arc::new(UnavailableFeed::new("b")),
        ]);
        assert!(det.scan(SUBJECT).await.is_err());
    }

    #[tokio::test]
    async fn second_lookup_is_cached() {
        let feed = StaticFeed::new("blocklist").with_hit(SUBJECT, blocklist_hit("scamdb"));
        let cache = IntelCache::new(16, 300);
        let det = ExternalIntelDetector::new(vec![Arc::new(feed)], cache.clone())
            .with_feed_timeout(Duration::from_millis(100));

        det.scan(SUBJECT).await.unwrap();
        det.scan(SUBJECT).await.unwrap();
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn no_feeds_means_no_signals() {
        let det = detector_with(vec![]);
        assert!(det.scan(SUBJECT).await.unwrap().is_empty());
    }
}
