//! Static domain tables and default thresholds
//!
//! Single source of truth: no hardcoded selectors or thresholds outside
//! this module.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::models::signal::{RiskTier, SignalCategory};

// ============================================
// Timeouts
// ============================================

/// Per-detector timeout (ms). One slow detector must not stall the caller.
pub const DEFAULT_DETECTOR_TIMEOUT_MS: u64 = 2_000;

/// Aggressive timeout for a single external intel feed query (ms).
pub const INTEL_FEED_TIMEOUT_MS: u64 = 3_000;

// ============================================
// Value/gas heuristic thresholds
// ============================================

/// Native value (ETH) above which a transfer is flagged as large.
pub const LARGE_VALUE_ETH: f64 = 10.0;

/// Gas price (gwei) above which priority/MEV intent is suspected.
pub const ELEVATED_GAS_PRICE_GWEI: u64 = 100;

/// Gas limit above which a call is considered unusually complex.
pub const HIGH_GAS_LIMIT: u64 = 1_000_000;

/// Calldata length (bytes) above which a zero-value call is non-trivial.
pub const NONTRIVIAL_CALLDATA_LEN: usize = 4;

// ============================================
// Method signature table
// ============================================

/// One entry of the static 4-byte selector table.
#[derive(Debug, Clone, Copy)]
pub struct MethodEntry {
    pub name: &'static str,
    pub param_spec: &'static str,
    pub category: SignalCategory,
    pub base_tier: RiskTier,
    pub description: &'static str,
    /// For approval-like calls: the decoded amount parameter to inspect
    /// for the unlimited sentinel, and its width in bits.
    pub approval_amount: Option<(&'static str, u16)>,
}

lazy_static! {
    /// Known risky (and canonical) call selectors.
    pub static ref METHOD_TABLE: HashMap<[u8; 4], MethodEntry> = {
        let mut m = HashMap::new();

        m.insert(
            [0x09, 0x5e, 0xa7, 0xb3],
            MethodEntry {
                name: "approve",
                param_spec: "approve(address,uint256)",
                category: SignalCategory::Approval,
                base_tier: RiskTier::High,
                description: "ERC-20 spending approval",
                approval_amount: Some(("amount", 256)),
            },
        );
        m.insert(
            [0xd5, 0x05, 0xac, 0xcf],
            MethodEntry {
                name: "permit",
                param_spec: "permit(address,address,uint256,uint256,uint8,bytes32,bytes32)",
                category: SignalCategory::Approval,
                base_tier: RiskTier::High,
                description: "EIP-2612 gasless approval",
                approval_amount: Some(("value", 256)),
            },
        );
        m.insert(
            [0x39, 0x50, 0x93, 0x51],
            MethodEntry {
                name: "increaseAllowance",
                param_spec: "increaseAllowance(address,uint256)",
                category: SignalCategory::Approval,
                base_tier: RiskTier::Medium,
                description: "Allowance increase",
                approval_amount: Some(("addedValue", 256)),
            },
        );
        m.insert(
            [0xa2, 0x2c, 0xb4, 0x65],
            MethodEntry {
                name: "setApprovalForAll",
                param_spec: "setApprovalForAll(address,bool)",
                category: SignalCategory::Approval,
                base_tier: RiskTier::High,
                description: "Blanket NFT collection approval",
                approval_amount: None,
            },
        );
        m.insert(
            [0xa9, 0x05, 0x9c, 0xbb],
            MethodEntry {
                name: "transfer",
                param_spec: "transfer(address,uint256)",
                category: SignalCategory::Transfer,
                base_tier: RiskTier::Low,
                description: "ERC-20 transfer",
                approval_amount: None,
            },
        );
        m.insert(
            [0x23, 0xb8, 0x72, 0xdd],
            MethodEntry {
                name: "transferFrom",
                param_spec: "transferFrom(address,address,uint256)",
                category: SignalCategory::Transfer,
                base_tier: RiskTier::Medium,
                description: "Delegated ERC-20 transfer",
                approval_amount: None,
            },
        );
        m.insert(
            [0xf2, 0xfd, 0xe3, 0x8b],
            MethodEntry {
                name: "transferOwnership",
                param_spec: "transferOwnership(address)",
                category: SignalCategory::Ownership,
                base_tier: RiskTier::High,
                description: "Contract ownership handover",
                approval_amount: None,
            },
        );
        m.insert(
            [0x71, 0x50, 0x18, 0xa6],
            MethodEntry {
                name: "renounceOwnership",
                param_spec: "renounceOwnership()",
                category: SignalCategory::Ownership,
                base_tier: RiskTier::Medium,
                description: "Ownership renouncement",
                approval_amount: None,
            },
        );
        m.insert(
            [0x40, 0xc1, 0x0f, 0x19],
            MethodEntry {
                name: "mint",
                param_spec: "mint(address,uint256)",
                category: SignalCategory::Ownership,
                base_tier: RiskTier::High,
                description: "Token supply minting",
                approval_amount: None,
            },
        );
        m.insert(
            [0x36, 0x59, 0xcf, 0xe6],
            MethodEntry {
                name: "upgradeTo",
                param_spec: "upgradeTo(address)",
                category: SignalCategory::Ownership,
                base_tier: RiskTier::Critical,
                description: "Proxy implementation swap",
                approval_amount: None,
            },
        );
        m.insert(
            [0x4f, 0x1e, 0xf2, 0x86],
            MethodEntry {
                name: "upgradeToAndCall",
                param_spec: "upgradeToAndCall(address,bytes)",
                category: SignalCategory::Ownership,
                base_tier: RiskTier::Critical,
                description: "Proxy implementation swap with call",
                approval_amount: None,
            },
        );
        m.insert(
            [0xe8, 0xe3, 0x37, 0x00],
            MethodEntry {
                name: "addLiquidity",
                param_spec: "addLiquidity(address,address,uint256,uint256,uint256,uint256,address,uint256)",
                category: SignalCategory::Liquidity,
                base_tier: RiskTier::Low,
                description: "DEX liquidity provision",
                approval_amount: None,
            },
        );
        m.insert(
            [0xba, 0xa2, 0xab, 0xde],
            MethodEntry {
                name: "removeLiquidity",
                param_spec: "removeLiquidity(address,address,uint256,uint256,uint256,address,uint256)",
                category: SignalCategory::Liquidity,
                base_tier: RiskTier::Medium,
                description: "DEX liquidity withdrawal",
                approval_amount: None,
            },
        );
        m.insert(
            [0x02, 0x75, 0x1c, 0xec],
            MethodEntry {
                name: "removeLiquidityETH",
                param_spec: "removeLiquidityETH(address,uint256,uint256,uint256,address,uint256)",
                category: SignalCategory::Liquidity,
                base_tier: RiskTier::Medium,
                description: "DEX liquidity withdrawal (ETH pair)",
                approval_amount: None,
            },
        );

        m
    };
}

/// Look up a selector in the static table.
pub fn method_entry(selector: &[u8; 4]) -> Option<&'static MethodEntry> {
    METHOD_TABLE.get(selector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approve_is_in_table() {
        let entry = method_entry(&[0x09, 0x5e, 0xa7, 0xb3]).expect("approve present");
        assert_eq!(entry.name, "approve");
        assert_eq!(entry.category, SignalCategory::Approval);
        assert!(entry.approval_amount.is_some());
    }

    #[test]
    fn unknown_selector_misses() {
        assert!(method_entry(&[0xff, 0xff, 0xff, 0xff]).is_none());
    }

    #[test]
    fn approval_entries_declare_amount_param() {
        for entry in METHOD_TABLE.values() {
            if let Some((param, bits)) = entry.approval_amount {
                assert!(!param.is_empty());
                assert!(bits > 0 && bits <= 256);
                assert_eq!(entry.category, SignalCategory::Approval);
            }
        }
    }
}
