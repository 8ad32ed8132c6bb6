//! Typed assessment inputs
//!
//! The engine never touches raw calldata or live feeds itself; upstream
//! suppliers (decoded-transaction layer, contract introspection, corpus
//! fetcher) hand it one of these already-shaped inputs.

use alloy_primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::errors::{EngineError, EngineResult};

/// A decoded call parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Uint(U256),
    Address(Address),
    Bool(bool),
    Bytes(Vec<u8>),
    Str(String),
}

impl ParamValue {
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            ParamValue::Uint(v) => Some(*v),
            _ => None,
        }
    }
}

/// Context the false-positive filter inspects. Derived from the input, not
/// from ambient state, so identical inputs dampen identically.
#[derive(Debug, Clone)]
pub struct AssessmentContext {
    /// Counterparty to check against the allow-list (tx recipient,
    /// contract address).
    pub counterparty: Option<Address>,
    /// 4-byte selector for canonical-operation matching.
    pub selector: Option<[u8; 4]>,
    /// When the subject was observed; drives the time-of-day filter.
    pub observed_at: DateTime<Utc>,
}

/// Anything the engine can assess. Each input type knows how to identify,
/// validate, and contextualize itself.
pub trait Assessable: Clone + Send + Sync + 'static {
    /// Stable subject identifier (also used as the intel-cache key).
    fn subject(&self) -> String;
    /// Structural validation. Failure is fatal for this assessment and is
    /// surfaced to the caller as a typed error; no partial verdict.
    fn validate(&self) -> EngineResult<()>;
    fn context(&self) -> AssessmentContext;
}

/// A decoded transaction, as handed over by the decoding layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxDescriptor {
    pub hash: B256,
    pub from: Address,
    pub to: Option<Address>,
    /// 4-byte selector, None for plain value transfers.
    pub selector: Option<[u8; 4]>,
    /// Decoded parameters by name, already hex-decoded upstream.
    pub decoded_params: BTreeMap<String, ParamValue>,
    /// Native value in wei.
    pub value: U256,
    pub gas_price_gwei: u64,
    pub gas_limit: u64,
    /// Raw calldata length in bytes.
    pub input_len: usize,
    pub observed_at: DateTime<Utc>,
}

impl TxDescriptor {
    pub fn param_uint(&self, name: &str) -> Option<U256> {
        self.decoded_params.get(name).and_then(ParamValue::as_uint)
    }
}

impl Assessable for TxDescriptor {
    fn subject(&self) -> String {
        format!("0x{}", hex::encode(self.hash))
    }

    fn validate(&self) -> EngineResult<()> {
        if self.input_len > 0 && self.input_len < 4 {
            return Err(EngineError::invalid_calldata(format!(
                "calldata of {} bytes is shorter than a selector",
                self.input_len
            )));
        }
        if self.selector.is_some() && self.input_len < 4 {
            return Err(EngineError::invalid_calldata(
                "selector present but calldata length < 4",
            ));
        }
        if self.selector.is_some() && self.to.is_none() {
            return Err(EngineError::invalid_address(
                "contract call without a recipient",
            ));
        }
        Ok(())
    }

    fn context(&self) -> AssessmentContext {
        AssessmentContext {
            counterparty: self.to,
            selector: self.selector,
            observed_at: self.observed_at,
        }
    }
}

/// Tokenomics snapshot of one contract, as produced by the introspection
/// layer. Percentages are in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractSnapshot {
    pub address: Address,
    pub holder_count: u32,
    pub top10_holder_percent: f64,
    pub liquidity_usd: f64,
    pub liquidity_locked: bool,
    pub lp_top_holder_percent: f64,
    pub has_blacklist: bool,
    pub has_mint: bool,
    pub has_pause: bool,
    pub hidden_owner: bool,
    pub ownership_renounced: bool,
    pub verified_source: bool,
    pub age_hours: u32,
    pub observed_at: DateTime<Utc>,
}

impl Assessable for ContractSnapshot {
    fn subject(&self) -> String {
        format!("{}", self.address)
    }

    fn validate(&self) -> EngineResult<()> {
        for (name, pct) in [
            ("top10_holder_percent", self.top10_holder_percent),
            ("lp_top_holder_percent", self.lp_top_holder_percent),
        ] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(EngineError::invalid_range(format!(
                    "{} out of range: {}",
                    name, pct
                )));
            }
        }
        if !self.liquidity_usd.is_finite() || self.liquidity_usd < 0.0 {
            return Err(EngineError::invalid_range(format!(
                "liquidity_usd out of range: {}",
                self.liquidity_usd
            )));
        }
        Ok(())
    }

    fn context(&self) -> AssessmentContext {
        AssessmentContext {
            counterparty: Some(self.address),
            selector: None,
            observed_at: self.observed_at,
        }
    }
}

/// Aggregated social-media mentions for one search-term bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformBatch {
    pub platform: String,
    pub mentions: u32,
    /// Average sentiment in [-1, 1]; negative means bearish/accusatory.
    pub avg_sentiment: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialCorpus {
    pub query: String,
    pub platforms: Vec<PlatformBatch>,
    pub observed_at: DateTime<Utc>,
}

impl SocialCorpus {
    pub fn total_mentions(&self) -> u32 {
        self.platforms.iter().map(|p| p.mentions).sum()
    }

    pub fn active_platforms(&self) -> usize {
        self.platforms.iter().filter(|p| p.mentions > 0).count()
    }
}

impl Assessable for SocialCorpus {
    fn subject(&self) -> String {
        self.query.clone()
    }

    fn validate(&self) -> EngineResult<()> {
        if self.query.trim().is_empty() {
            return Err(EngineError::invalid_range("empty search query"));
        }
        for p in &self.platforms {
            if !(-1.0..=1.0).contains(&p.avg_sentiment) {
                return Err(EngineError::invalid_range(format!(
                    "avg_sentiment out of range for {}: {}",
                    p.platform, p.avg_sentiment
                )));
            }
        }
        Ok(())
    }

    fn context(&self) -> AssessmentContext {
        AssessmentContext {
            counterparty: None,
            selector: None,
            observed_at: self.observed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    pub fn sample_tx() -> TxDescriptor {
        TxDescriptor {
            hash: B256::repeat_byte(0xab),
            from: Address::repeat_byte(0x11),
            to: Some(Address::repeat_byte(0x22)),
            selector: Some([0x09, 0x5e, 0xa7, 0xb3]),
            decoded_params: BTreeMap::new(),
            value: U256::ZERO,
            gas_price_gwei: 20,
            gas_limit: 60_000,
            input_len: 68,
            observed_at: Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn tx_subject_is_hash_hex() {
        let tx = sample_tx();
        assert!(tx.subject().starts_with("0x"));
        assert_eq!(tx.subject().len(), 2 + 64);
    }

    #[test]
    fn tx_rejects_truncated_calldata() {
        let mut tx = sample_tx();
        tx.input_len = 3;
        tx.selector = None;
        assert!(tx.validate().is_err());
    }

    #[test]
    fn tx_rejects_call_without_recipient() {
        let mut tx = sample_tx();
        tx.to = None;
        assert!(tx.validate().is_err());
    }

    #[test]
    fn snapshot_rejects_bad_percent() {
        let snap = ContractSnapshot {
            address: Address::repeat_byte(0x33),
            holder_count: 100,
            top10_holder_percent: 120.0,
            liquidity_usd: 5000.0,
            liquidity_locked: false,
            lp_top_holder_percent: 10.0,
            has_blacklist: false,
            has_mint: false,
            has_pause: false,
            hidden_owner: false,
            ownership_renounced: false,
            verified_source: true,
            age_hours: 100,
            observed_at: Utc::now(),
        };
        assert!(snap.validate().is_err());
    }

    #[test]
    fn corpus_rejects_empty_query() {
        let corpus = SocialCorpus {
            query: "  ".into(),
            platforms: vec![],
            observed_at: Utc::now(),
        };
        assert!(corpus.validate().is_err());
    }
}
