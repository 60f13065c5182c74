//! Error types for parallels.
//!
//! Every engine entry point returns `Result<T, ParError>`. Input errors are
//! detected before any worker is spawned, so a failed call never leaves
//! partially written caller-visible state behind.

use thiserror::Error;

/// Result type alias for parallels operations.
pub type ParResult<T> = Result<T, ParError>;

/// Unified error type for all parallels operations.
#[derive(Debug, Error)]
pub enum ParError {
    // ===== Input Errors =====
    /// A required matrix or graph is absent (or has no cells).
    #[error("Null input: {what} is missing or empty")]
    NullInput {
        /// Which input was missing.
        what: &'static str,
    },

    /// Operand shapes are incompatible.
    #[error("Dimension mismatch: {left} vs {right}")]
    DimensionMismatch {
        /// Shape description of the left operand.
        left: String,
        /// Shape description of the right operand.
        right: String,
    },

    /// Non-positive or out-of-range numeric parameter.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// Graph cannot produce a closed tour (stranded ant, unreachable start).
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    // ===== Worker Errors =====
    /// A spawned worker panicked before finishing its stage.
    #[error("Worker panicked during {stage}")]
    WorkerPanicked {
        /// Stage the worker was executing.
        stage: &'static str,
    },

    /// A shared resource lock was poisoned by a panicking worker.
    #[error("Lock poisoned: {resource}")]
    Poisoned {
        /// Name of the protected resource.
        resource: &'static str,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// Malformed matrix text.
    #[error("Parse error: {0}")]
    Parse(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ParError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid-parameter error.
    #[must_use]
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Create an invalid-graph error.
    #[must_use]
    pub fn invalid_graph(message: impl Into<String>) -> Self {
        Self::InvalidGraph(message.into())
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Shape mismatch between two `rows x cols` shapes.
    #[must_use]
    pub fn dimension_mismatch(left: (usize, usize), right: (usize, usize)) -> Self {
        Self::DimensionMismatch {
            left: format!("{}x{}", left.0, left.1),
            right: format!("{}x{}", right.0, right.1),
        }
    }

    /// Check if this error was caused by caller input (rejected before any
    /// worker was spawned).
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::NullInput { .. }
                | Self::DimensionMismatch { .. }
                | Self::InvalidParameter { .. }
        )
    }
}
