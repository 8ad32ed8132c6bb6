//! Centralized error handling
//!
//! Every failure carries a unique string code for log grep-ability.
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - DETECTOR_xxx: signal-source failures (recoverable, absorbed into traces)
//! - INPUT_xxx: malformed input (fatal for that assessment)
//! - CFG_xxx: configuration errors (fatal at load; the engine refuses to
//!   serve with invalid configuration)

use std::fmt;

/// Engine-wide error type.
#[derive(Debug)]
pub struct EngineError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl EngineError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Error code as string (for logging).
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Detector Errors (recoverable - these degrade
    // confidence, they never abort an assessment)
    // ============================================
    /// Detector exceeded its timeout
    DetectorTimeout,
    /// Detector returned a transient failure
    DetectorUnavailable,
    /// Detector task panicked
    DetectorPanicked,

    // ============================================
    // Input Errors (fatal for one assessment)
    // ============================================
    /// Malformed address
    InputInvalidAddress,
    /// Calldata present but shorter than a selector
    InputInvalidCalldata,
    /// Numeric field outside its legal range
    InputInvalidRange,

    // ============================================
    // Configuration Errors (fatal at startup)
    // ============================================
    /// Multiplier factor <= 1.0 or empty occurrence predicate
    ConfigInvalidMultiplier,
    /// Malformed alert rule condition
    ConfigInvalidRule,
    /// Scale min/max/ceiling inconsistent
    ConfigInvalidScale,
    /// Classifier thresholds not strictly descending within the scale
    ConfigInvalidThresholds,
    /// False-positive filter config out of range
    ConfigInvalidFilter,

    // ============================================
    // Generic
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DetectorTimeout => "DETECTOR_TIMEOUT",
            Self::DetectorUnavailable => "DETECTOR_UNAVAILABLE",
            Self::DetectorPanicked => "DETECTOR_PANICKED",

            Self::InputInvalidAddress => "INPUT_INVALID_ADDRESS",
            Self::InputInvalidCalldata => "INPUT_INVALID_CALLDATA",
            Self::InputInvalidRange => "INPUT_INVALID_RANGE",

            Self::ConfigInvalidMultiplier => "CFG_INVALID_MULTIPLIER",
            Self::ConfigInvalidRule => "CFG_INVALID_RULE",
            Self::ConfigInvalidScale => "CFG_INVALID_SCALE",
            Self::ConfigInvalidThresholds => "CFG_INVALID_THRESHOLDS",
            Self::ConfigInvalidFilter => "CFG_INVALID_FILTER",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Recoverable errors are absorbed into the detector trace and only
    /// reduce confidence; everything else surfaces to the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DetectorTimeout | Self::DetectorUnavailable | Self::DetectorPanicked
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl EngineError {
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InputInvalidAddress, msg)
    }

    pub fn invalid_calldata(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InputInvalidCalldata, msg)
    }

    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InputInvalidRange, msg)
    }

    pub fn invalid_multiplier(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidMultiplier, msg)
    }

    pub fn invalid_rule(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidRule, msg)
    }

    pub fn invalid_scale(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidScale, msg)
    }

    pub fn invalid_thresholds(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidThresholds, msg)
    }

    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidFilter, msg)
    }

    pub fn detector_timeout(detector: &str) -> Self {
        Self::new(
            ErrorCode::DetectorTimeout,
            format!("Detector timed out: {}", detector),
        )
    }
}

// ============================================
// Result type alias
// ============================================

pub type EngineResult<T> = Result<T, EngineError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for EngineError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::DetectorUnavailable, err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::ConfigInvalidRule, "JSON parse error", err)
    }
}
