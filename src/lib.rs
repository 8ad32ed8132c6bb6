//! Chain Sentinel - layered risk scoring and alerting engine
//!
//! Turns raw observations (decoded transactions, contract tokenomics
//! snapshots, social-media corpora) into explainable threat verdicts:
//!
//! - Detectors emit typed, weighted [`models::Signal`]s concurrently
//! - One shared aggregation algorithm sums and amplifies them
//! - A bounded false-positive filter dampens known-benign patterns
//! - A threshold classifier assigns the discrete [`models::RiskLevel`]
//! - Configurable alert rules fire on the finished verdict
//!
//! Three profiles instantiate the same pipeline: transaction threat,
//! contract/tokenomics risk, and social sentiment.

pub mod core;
pub mod detectors;
pub mod models;
pub mod profiles;
pub mod utils;

pub use crate::core::engine::Engine;
pub use crate::models::config::EngineConfig;
pub use crate::models::errors::{EngineError, EngineResult};
pub use crate::models::input::{Assessable, ContractSnapshot, SocialCorpus, TxDescriptor};
pub use crate::models::signal::{Signal, SignalCategory, SignalSet};
pub use crate::models::verdict::{RiskLevel, ThreatAssessment};
