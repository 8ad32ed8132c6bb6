//! Profile assembly - one module per engine instantiation
//!
//! Each profile pairs a default configuration (scale, thresholds,
//! multiplier table, alert rules) with its standard detector set. Callers
//! can tweak the config before `build`; validation happens at engine
//! construction.

pub mod contract;
pub mod social;
pub mod transaction;
