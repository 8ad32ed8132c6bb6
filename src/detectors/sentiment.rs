//! Sentiment detector family for the social profile
//!
//! Works on the 0-10 scale: weights here are roughly a tenth of the
//! on-chain families. Confidence grows with mention volume so a single
//! angry post does not move the needle.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::detectors::Detector;
use crate::models::input::SocialCorpus;
use crate::models::signal::{Signal, SignalCategory};

const NEGATIVE_SENTIMENT_CUTOFF: f64 = -0.3;
const POSITIVE_SENTIMENT_CUTOFF: f64 = 0.5;
const NEGATIVE_BASE_WEIGHT: f64 = 2.5;
const POSITIVE_WEIGHT: f64 = -1.0;
const FULL_CONFIDENCE_MENTIONS: u32 = 50;

const SURGE_MENTION_THRESHOLD: u32 = 200;
const SURGE_WEIGHT: f64 = 2.0;

fn volume_confidence(mentions: u32) -> f64 {
    (mentions as f64 / FULL_CONFIDENCE_MENTIONS as f64).min(1.0)
}

/// Scores average sentiment per platform.
pub struct PlatformSentimentDetector;

impl PlatformSentimentDetector {
    fn scan(corpus: &SocialCorpus) -> Vec<Signal> {
        let src = "platform_sentiment";
        let mut signals = Vec::new();

        for batch in &corpus.platforms {
            if batch.mentions == 0 {
                continue;
            }
            let confidence = volume_confidence(batch.mentions);
            if batch.avg_sentiment <= NEGATIVE_SENTIMENT_CUTOFF {
                // Weight scales with how negative the chatter is.
                let weight = NEGATIVE_BASE_WEIGHT * batch.avg_sentiment.abs().min(1.0) / 0.3;
                signals.push(Signal::new(
                    SignalCategory::Sentiment,
                    "NEGATIVE_SENTIMENT",
                    weight.min(3.0),
                    confidence,
                    format!(
                        "{}: avg sentiment {:.2} over {} mentions",
                        batch.platform, batch.avg_sentiment, batch.mentions
                    ),
                    src,
                ));
            } else if batch.avg_sentiment >= POSITIVE_SENTIMENT_CUTOFF {
                signals.push(Signal::new(
                    SignalCategory::Sentiment,
                    "POSITIVE_SENTIMENT",
                    POSITIVE_WEIGHT,
                    confidence,
                    format!(
                        "{}: avg sentiment {:.2} over {} mentions",
                        batch.platform, batch.avg_sentiment, batch.mentions
                    ),
                    src,
                ));
            }
        }

        signals
    }
}

impl Detector<SocialCorpus> for PlatformSentimentDetector {
    fn name(&self) -> &'static str {
        "platform_sentiment"
    }

    fn detect<'a>(&'a self, input: &'a SocialCorpus) -> BoxFuture<'a, eyre::Result<Vec<Signal>>> {
        async move { Ok(Self::scan(input)) }.boxed()
    }
}

/// Flags sudden cross-platform mention surges.
pub struct MentionVolumeDetector;

impl MentionVolumeDetector {
    fn scan(corpus: &SocialCorpus) -> Vec<Signal> {
        let total = corpus.total_mentions();
        if total <= SURGE_MENTION_THRESHOLD {
            return Vec::new();
        }
        // More platforms talking at once means more trust in the surge.
        let diversity = (corpus.active_platforms() as f64 / 4.0).min(1.0);
        let volume = (total as f64 / (SURGE_MENTION_THRESHOLD as f64 * 4.0)).min(1.0);
        let confidence = (0.5 + 0.5 * volume * diversity).min(1.0);

        vec![Signal::new(
            SignalCategory::Sentiment,
            "MENTION_SURGE",
            SURGE_WEIGHT,
            confidence,
            format!(
                "{} mentions across {} platforms",
                total,
                corpus.active_platforms()
            ),
            "mention_volume",
        )]
    }
}

impl Detector<SocialCorpus> for MentionVolumeDetector {
    fn name(&self) -> &'static str {
        "mention_volume"
    }

    fn detect<'a>(&'a self, input: &'a SocialCorpus) -> BoxFuture<'a, eyre::Result<Vec<Signal>>> {
        async move { Ok(Self::scan(input)) }.boxed()
    }
}
