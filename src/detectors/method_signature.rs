//! Method-signature risk detector
//!
//! Maps a decoded call's 4-byte selector to the static method table. For
//! approval-like calls it additionally inspects the decoded amount: an
//! amount equal to the maximum representable value for the parameter width
//! is an unlimited approval, which is unconditionally dangerous and emitted
//! as a hard override rather than a weighted contribution.

use alloy_primitives::U256;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::detectors::Detector;
use crate::models::input::TxDescriptor;
use crate::models::signal::{RiskTier, Signal};
use crate::utils::constants::{method_entry, MethodEntry};

const DETECTOR_NAME: &str = "method_signature";

/// Confidence for a plain table match. The table is static, but upstream
/// decoding can mis-attribute overloaded selectors.
const TABLE_MATCH_CONFIDENCE: f64 = 0.9;

pub struct MethodSignatureDetector;

impl MethodSignatureDetector {
    pub fn new() -> Self {
        Self
    }

    /// Maximum representable unsigned integer for a parameter width.
    fn max_for_width(bits: u16) -> U256 {
        if bits >= 256 {
            U256::MAX
        } else {
            (U256::from(1u8) << bits) - U256::from(1u8)
        }
    }

    fn unlimited_signal(entry: &MethodEntry, tx: &TxDescriptor) -> Option<Signal> {
        let (param, bits) = entry.approval_amount?;
        let amount = tx.param_uint(param)?;
        if amount != Self::max_for_width(bits) {
            return None;
        }

        let kind = if entry.name == "permit" {
            "UNLIMITED_PERMIT"
        } else {
            "UNLIMITED_APPROVAL"
        };
        Some(
            Signal::new(
                entry.category,
                kind,
                RiskTier::Critical.base_weight(),
                1.0,
                format!(
                    "{} grants an unlimited ({}-bit max) allowance",
                    entry.param_spec, bits
                ),
                DETECTOR_NAME,
            )
            .with_hard_override(),
        )
    }

    fn scan(&self, tx: &TxDescriptor) -> Vec<Signal> {
        let selector = match tx.selector {
            Some(sel) => sel,
            None => return Vec::new(), // plain value transfer
        };

        let entry = match method_entry(&selector) {
            Some(e) => e,
            None => return Vec::new(), // unknown selector: absence is normal
        };

        // Unlimited approval supersedes the base tier entirely.
        if let Some(unlimited) = Self::unlimited_signal(entry, tx) {
            return vec![unlimited];
        }

        vec![Signal::new(
            entry.category,
            entry.name.to_uppercase(),
            entry.base_tier.base_weight(),
            TABLE_MATCH_CONFIDENCE,
            format!("{}: {}", entry.param_spec, entry.description),
            DETECTOR_NAME,
        )]
    }
}

impl Default for MethodSignatureDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector<TxDescriptor> for MethodSignatureDetector {
    fn name(&self) -> &'static str {
        DETECTOR_NAME
    }

    fn detect<'a>(&'a self, input: &'a TxDescriptor) -> BoxFuture<'a, eyre::Result<Vec<Signal>>> {
        async move { Ok(self.scan(input)) }.boxed()
    }
}
