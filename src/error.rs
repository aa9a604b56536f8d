//! Error types for declaration validation and reconciliation.
//!
//! Validation errors are raised synchronously at the point where an option
//! or declaration field is set, so a bad declaration fails before any
//! system state is touched. Reconciliation-time failures (npm, filesystem,
//! initctl) propagate as `anyhow` errors from the resources themselves.

use thiserror::Error;

/// Errors produced by the schema/validation layer and plan construction.
#[derive(Debug, Error)]
pub enum Error {
    /// An option value does not match the schema kind for its key.
    #[error("invalid type for option '{key}': expected {expected}, got {actual}")]
    InvalidType {
        /// Option key that was being set
        key: String,
        /// Human-readable name of the expected kind
        expected: &'static str,
        /// Description of the rejected value
        actual: String,
    },

    /// A version string is neither `latest` nor `x.y.z`.
    #[error("invalid version '{0}': valid versions are 'latest' or 'x.y.z'")]
    InvalidVersion(String),

    /// A structured option was set while a full config override is active.
    #[error("option '{0}' cannot be combined with a full config override")]
    ConflictingConfiguration(String),

    /// The declaration names an option the schema does not know.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// Init scripts are only supported on Upstart systems.
    #[error("init scripts are not supported on '{init_system}' init systems")]
    UnsupportedPlatform {
        /// Name of the detected init system
        init_system: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for validation and planning operations.
pub type Result<T> = std::result::Result<T, Error>;
