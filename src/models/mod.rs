//! Models Module - Data Structures & Configuration
//!
//! Single source of truth for signals, verdicts, typed inputs, errors,
//! and engine configuration.

pub mod config;
pub mod errors;
pub mod input;
pub mod signal;
pub mod verdict;

pub use config::*;
pub use errors::*;
pub use input::*;
pub use signal::*;
pub use verdict::*;
