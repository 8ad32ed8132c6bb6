//! Value/gas heuristics detector
//!
//! Cheap structural checks on the transaction envelope: large native-value
//! transfers, elevated gas price (priority/MEV indicator), unusually high
//! gas limit, and zero-value calls carrying non-trivial calldata against an
//! unrecognized selector (suspicious for disguised state changes).

use alloy_primitives::U256;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::detectors::Detector;
use crate::models::input::TxDescriptor;
use crate::models::signal::{Signal, SignalCategory};
use crate::utils::constants::{
    method_entry, ELEVATED_GAS_PRICE_GWEI, HIGH_GAS_LIMIT, LARGE_VALUE_ETH,
    NONTRIVIAL_CALLDATA_LEN,
};

const DETECTOR_NAME: &str = "value_gas";

/// Thresholds are constructor parameters so profiles can tune them; the
/// defaults come from the constants module.
pub struct ValueGasDetector {
    large_value_eth: f64,
    elevated_gas_gwei: u64,
    high_gas_limit: u64,
}

impl ValueGasDetector {
    pub fn new() -> Self {
        Self {
            large_value_eth: LARGE_VALUE_ETH,
            elevated_gas_gwei: ELEVATED_GAS_PRICE_GWEI,
            high_gas_limit: HIGH_GAS_LIMIT,
        }
    }

    fn scan(&self, tx: &TxDescriptor) -> Vec<Signal> {
        let mut signals = Vec::new();
        let value_eth = wei_to_eth(tx.value);

        if value_eth > self.large_value_eth {
            signals.push(Signal::new(
                SignalCategory::ValueGas,
                "LARGE_VALUE",
                25.0,
                1.0,
                format!("large native transfer: {:.4} ETH", value_eth),
                DETECTOR_NAME,
            ));
        }

        if tx.gas_price_gwei > self.elevated_gas_gwei {
            signals.push(Signal::new(
                SignalCategory::ValueGas,
                "ELEVATED_GAS_PRICE",
                20.0,
                0.8,
                format!(
                    "gas price {} gwei exceeds {} gwei - priority/MEV indicator",
                    tx.gas_price_gwei, self.elevated_gas_gwei
                ),
                DETECTOR_NAME,
            ));
        }

        if tx.gas_limit > self.high_gas_limit {
            signals.push(Signal::new(
                SignalCategory::ValueGas,
                "HIGH_GAS_USAGE",
                15.0,
                0.7,
                format!("gas limit {} indicates a complex call", tx.gas_limit),
                DETECTOR_NAME,
            ));
        }

        // Zero value but real calldata on a selector the table doesn't know:
        // state change disguised as something benign. Known selectors are
        // already covered by the method-signature detector.
        let unknown_selector = tx
            .selector
            .map(|sel| method_entry(&sel).is_none())
            .unwrap_or(false);
        if tx.value.is_zero() && tx.input_len > NONTRIVIAL_CALLDATA_LEN && unknown_selector {
            signals.push(Signal::new(
                SignalCategory::ValueGas,
                "ZERO_VALUE_CALLDATA",
                20.0,
                0.6,
                format!(
                    "zero-value call with {} bytes of calldata to an unknown method",
                    tx.input_len
                ),
                DETECTOR_NAME,
            ));
        }

        signals
    }
}

impl Default for ValueGasDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector<TxDescriptor> for ValueGasDetector {
    fn name(&self) -> &'static str {
        DETECTOR_NAME
    }

    fn detect<'a>(&'a self, input: &'a TxDescriptor) -> BoxFuture<'a, eyre::Result<Vec<Signal>>> {
        async move { Ok(self.scan(input)) }.boxed()
    }
}

/// Convert wei to ETH.
fn wei_to_eth(wei: U256) -> f64 {
    let wei_u128: u128 = wei.try_into().unwrap_or(u128::MAX);
    wei_u128 as f64 / 1e18
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn base_tx() -> TxDescriptor {
        TxDescriptor {
            hash: B256::repeat_byte(0x01),
            from: Address::repeat_byte(0x11),
            to: Some(Address::repeat_byte(0x22)),
            selector: None,
            decoded_params: BTreeMap::new(),
            value: U256::ZERO,
            gas_price_gwei: 20,
            gas_limit: 21_000,
            input_len: 0,
            observed_at: Utc::now(),
        }
    }

    fn eth(amount: u64) -> U256 {
        U256::from(amount) * U256::from(10u64).pow(U256::from(18u64))
    }

    #[test]
    fn quiet_transfer_emits_nothing() {
        assert!(ValueGasDetector::new().scan(&base_tx()).is_empty());
    }

    #[test]
    fn large_value_flagged() {
        let mut tx = base_tx();
        tx.value = eth(50);
        let signals = ValueGasDetector::new().scan(&tx);
        assert!(signals.iter().any(|s| s.kind == "LARGE_VALUE"));
    }

    #[test]
    fn elevated_gas_price_flagged() {
        let mut tx = base_tx();
        tx.gas_price_gwei = 400;
        let signals = ValueGasDetector::new().scan(&tx);
        assert!(signals.iter().any(|s| s.kind == "ELEVATED_GAS_PRICE"));
    }

    #[test]
    fn high_gas_limit_flagged() {
        let mut tx = base_tx();
        tx.gas_limit = 3_000_000;
        let signals = ValueGasDetector::new().scan(&tx);
        assert!(signals.iter().any(|s| s.kind == "HIGH_GAS_USAGE"));
    }

    #[test]
    fn zero_value_unknown_calldata_flagged() {
        let mut tx = base_tx();
        tx.selector = Some([0xde, 0xad, 0xbe, 0xef]);
        tx.input_len = 132;
        let signals = ValueGasDetector::new().scan(&tx);
        assert!(signals.iter().any(|s| s.kind == "ZERO_VALUE_CALLDATA"));
    }

    #[test]
    fn zero_value_known_selector_not_double_counted() {
        let mut tx = base_tx();
        tx.selector = Some([0x09, 0x5e, 0xa7, 0xb3]); // approve - method table's job
        tx.input_len = 68;
        let signals = ValueGasDetector::new().scan(&tx);
        assert!(!signals.iter().any(|s| s.kind == "ZERO_VALUE_CALLDATA"));
    }
}
