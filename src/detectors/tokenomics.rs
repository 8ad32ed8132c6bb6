//! Tokenomics detector family for the contract profile
//!
//! Heuristics over a contract's tokenomics snapshot: centralized-control
//! functions, holder/whale distribution, and liquidity depth. Weights are
//! on the 0-100 scale; risk-reducing evidence (renounced ownership,
//! verified source, locked liquidity) carries negative weight.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::detectors::Detector;
use crate::models::input::ContractSnapshot;
use crate::models::signal::{Signal, SignalCategory};

// Control-function weights
const BLACKLIST_WEIGHT: f64 = 35.0;
const HIDDEN_OWNER_WEIGHT: f64 = 30.0;
const MINT_WEIGHT: f64 = 25.0;
const PAUSE_WEIGHT: f64 = 15.0;
const OWNERSHIP_RENOUNCED_WEIGHT: f64 = -20.0;
const VERIFIED_SOURCE_WEIGHT: f64 = -15.0;

// Holder-distribution weights and thresholds
const WHALE_CONCENTRATION_WEIGHT: f64 = 25.0;
const WHALE_TOP10_PERCENT: f64 = 50.0;
const LOW_HOLDERS_WEIGHT: f64 = 20.0;
const LOW_HOLDER_COUNT: u32 = 50;
const MANY_HOLDERS_WEIGHT: f64 = -10.0;
const MANY_HOLDER_COUNT: u32 = 1_000;

// Liquidity weights and thresholds
const LOW_LIQUIDITY_WEIGHT: f64 = 25.0;
const LOW_LIQUIDITY_USD: f64 = 1_000.0;
const DEEP_LIQUIDITY_WEIGHT: f64 = -10.0;
const DEEP_LIQUIDITY_USD: f64 = 100_000.0;
const LOCKED_LIQUIDITY_WEIGHT: f64 = -15.0;
const CONCENTRATED_LP_WEIGHT: f64 = 20.0;
const CONCENTRATED_LP_PERCENT: f64 = 80.0;
const NEW_TOKEN_WEIGHT: f64 = 15.0;
const NEW_TOKEN_AGE_HOURS: u32 = 24;

/// Flags owner-controlled functions that can rug holders.
pub struct CentralizedControlDetector;

impl CentralizedControlDetector {
    fn scan(snap: &ContractSnapshot) -> Vec<Signal> {
        let src = "centralized_control";
        let mut signals = Vec::new();

        if snap.has_blacklist {
            signals.push(Signal::new(
                SignalCategory::Ownership,
                "BLACKLIST_FUNCTION",
                BLACKLIST_WEIGHT,
                0.9,
                "contract can blacklist addresses from trading",
                src,
            ));
        }
        if snap.hidden_owner {
            signals.push(Signal::new(
                SignalCategory::Ownership,
                "HIDDEN_OWNER",
                HIDDEN_OWNER_WEIGHT,
                0.85,
                "contract has a hidden ownership mechanism",
                src,
            ));
        }
        if snap.has_mint {
            signals.push(Signal::new(
                SignalCategory::Ownership,
                "MINT_FUNCTION",
                MINT_WEIGHT,
                0.9,
                "contract can mint new tokens",
                src,
            ));
        }
        if snap.has_pause {
            signals.push(Signal::new(
                SignalCategory::Ownership,
                "PAUSE_FUNCTION",
                PAUSE_WEIGHT,
                0.9,
                "trading can be paused by the owner",
                src,
            ));
        }
        if snap.ownership_renounced {
            signals.push(Signal::new(
                SignalCategory::Ownership,
                "OWNERSHIP_RENOUNCED",
                OWNERSHIP_RENOUNCED_WEIGHT,
                0.9,
                "ownership renounced - owner controls disabled",
                src,
            ));
        }
        if snap.verified_source {
            signals.push(Signal::new(
                SignalCategory::Identity,
                "VERIFIED_SOURCE",
                VERIFIED_SOURCE_WEIGHT,
                0.9,
                "contract source is verified",
                src,
            ));
        }

        signals
    }
}

impl Detector<ContractSnapshot> for CentralizedControlDetector {
    fn name(&self) -> &'static str {
        "centralized_control"
    }

    fn detect<'a>(
        &'a self,
        input: &'a ContractSnapshot,
    ) -> BoxFuture<'a, eyre::Result<Vec<Signal>>> {
        async move { Ok(Self::scan(input)) }.boxed()
    }
}

/// Flags whale-heavy holder distributions.
pub struct HolderDistributionDetector;

impl HolderDistributionDetector {
    fn scan(snap: &ContractSnapshot) -> Vec<Signal> {
        let src = "holder_distribution";
        let mut signals = Vec::new();

        if snap.top10_holder_percent > WHALE_TOP10_PERCENT {
            signals.push(Signal::new(
                SignalCategory::Transfer,
                "WHALE_CONCENTRATION",
                WHALE_CONCENTRATION_WEIGHT,
                0.85,
                format!("top 10 holders own {:.1}%", snap.top10_holder_percent),
                src,
            ));
        }
        if snap.holder_count < LOW_HOLDER_COUNT {
            signals.push(Signal::new(
                SignalCategory::Transfer,
                "LOW_HOLDER_COUNT",
                LOW_HOLDERS_WEIGHT,
                0.8,
                format!("only {} holders", snap.holder_count),
                src,
            ));
        } else if snap.holder_count > MANY_HOLDER_COUNT {
            signals.push(Signal::new(
                SignalCategory::Transfer,
                "BROAD_DISTRIBUTION",
                MANY_HOLDERS_WEIGHT,
                0.8,
                format!("{} holders - broad distribution", snap.holder_count),
                src,
            ));
        }

        signals
    }
}

impl Detector<ContractSnapshot> for HolderDistributionDetector {
    fn name(&self) -> &'static str {
        "holder_distribution"
    }

    fn detect<'a>(
        &'a self,
        input: &'a ContractSnapshot,
    ) -> BoxFuture<'a, eyre::Result<Vec<Signal>>> {
        async move { Ok(Self::scan(input)) }.boxed()
    }
}

/// Flags shallow, concentrated, or brand-new liquidity.
pub struct LiquidityDetector;

impl LiquidityDetector {
    fn scan(snap: &ContractSnapshot) -> Vec<Signal> {
        let src = "liquidity";
        let mut signals = Vec::new();

        if snap.liquidity_usd < LOW_LIQUIDITY_USD {
            signals.push(Signal::new(
                SignalCategory::Liquidity,
                "LOW_LIQUIDITY",
                LOW_LIQUIDITY_WEIGHT,
                0.9,
                format!("liquidity is only ${:.0}", snap.liquidity_usd),
                src,
            ));
        } else if snap.liquidity_usd > DEEP_LIQUIDITY_USD {
            signals.push(Signal::new(
                SignalCategory::Liquidity,
                "DEEP_LIQUIDITY",
                DEEP_LIQUIDITY_WEIGHT,
                0.9,
                format!("deep liquidity: ${:.0}", snap.liquidity_usd),
                src,
            ));
        }
        if snap.liquidity_locked {
            signals.push(Signal::new(
                SignalCategory::Liquidity,
                "LOCKED_LIQUIDITY",
                LOCKED_LIQUIDITY_WEIGHT,
                0.85,
                "liquidity is locked",
                src,
            ));
        }
        if snap.lp_top_holder_percent > CONCENTRATED_LP_PERCENT {
            signals.push(Signal::new(
                SignalCategory::Liquidity,
                "CONCENTRATED_LP",
                CONCENTRATED_LP_WEIGHT,
                0.85,
                format!("top LP holder owns {:.1}%", snap.lp_top_holder_percent),
                src,
            ));
        }
        if snap.age_hours < NEW_TOKEN_AGE_HOURS {
            signals.push(Signal::new(
                SignalCategory::Identity,
                "NEW_TOKEN",
                NEW_TOKEN_WEIGHT,
                0.9,
                format!("token is only {} hours old", snap.age_hours),
                src,
            ));
        }

        signals
    }
}

impl Detector<ContractSnapshot> for LiquidityDetector {
    fn name(&self) -> &'static str {
        "liquidity"
    }

    fn detect<'a>(
        &'a self,
        input: &'a ContractSnapshot,
    ) -> BoxFuture<'a, eyre::Result<Vec<Signal>>> {
        async move { Ok(Self::scan(input)) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;
    use chrono::Utc;

    fn clean_snapshot() -> ContractSnapshot {
        ContractSnapshot {
            address: Address::repeat_byte(0x33),
            holder_count: 5_000,
            top10_holder_percent: 20.0,
            liquidity_usd: 500_000.0,
            liquidity_locked: true,
            lp_top_holder_percent: 15.0,
            has_blacklist: false,
            has_mint: false,
            has_pause: false,
            hidden_owner: false,
            ownership_renounced: true,
            verified_source: true,
            age_hours: 2_000,
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn clean_contract_only_reduces_risk() {
        let snap = clean_snapshot();
        let all: Vec<Signal> = CentralizedControlDetector::scan(&snap)
            .into_iter()
            .chain(HolderDistributionDetector::scan(&snap))
            .chain(LiquidityDetector::scan(&snap))
            .collect();
        assert!(!all.is_empty());
        assert!(all.iter().all(|s| s.weight < 0.0));
    }

    #[test]
    fn rug_shaped_contract_is_heavily_flagged() {
        let snap = ContractSnapshot {
            has_blacklist: true,
            has_mint: true,
            hidden_owner: true,
            ownership_renounced: false,
            verified_source: false,
            holder_count: 20,
            top10_holder_percent: 90.0,
            liquidity_usd: 400.0,
            liquidity_locked: false,
            lp_top_holder_percent: 95.0,
            age_hours: 3,
            ..clean_snapshot()
        };

        let control = CentralizedControlDetector::scan(&snap);
        assert_eq!(control.len(), 3);
        assert!(control.iter().all(|s| s.weight > 0.0));

        let holders = HolderDistributionDetector::scan(&snap);
        assert!(holders.iter().any(|s| s.kind == "WHALE_CONCENTRATION"));
        assert!(holders.iter().any(|s| s.kind == "LOW_HOLDER_COUNT"));

        let liq = LiquidityDetector::scan(&snap);
        assert!(liq.iter().any(|s| s.kind == "LOW_LIQUIDITY"));
        assert!(liq.iter().any(|s| s.kind == "CONCENTRATED_LP"));
        assert!(liq.iter().any(|s| s.kind == "NEW_TOKEN"));
    }
}
