//! Unified error handling for hwtree
//!
//! One error type shared by the device model, the sysfs enumerator and the
//! command line front-end. Lookups that simply find nothing are not errors
//! anywhere in the workspace; they come back as `Option`.

use std::io;
use std::path::PathBuf;

/// Result type alias using HwtreeError
pub type Result<T> = std::result::Result<T, HwtreeError>;

/// Unified error type for all hwtree operations
#[derive(thiserror::Error, Debug)]
pub enum HwtreeError {
    // ============================================================================
    // I/O and File System Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid path {path}: {reason}")]
    InvalidPath {
        path: PathBuf,
        reason: String,
    },

    // ============================================================================
    // Device Model Errors
    // ============================================================================
    #[error("Device record for subsystem {subsystem:?} has no system path")]
    MissingSystemPath {
        subsystem: Option<String>,
    },

    #[error("Cannot attach {child} under {parent}: it was constructed with parent {declared:?}")]
    ParentMismatch {
        parent: String,
        child: String,
        declared: Option<String>,
    },

    #[error("Parent {parent} of device {device} is not in the tree")]
    ParentNotFound {
        device: String,
        parent: String,
    },

    #[error("Unknown device type: {0}")]
    UnknownDeviceType(String),

    #[error("Unknown device attribute: {0}")]
    UnknownDeviceAttribute(String),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Generic(String),
}

impl HwtreeError {
    /// Create a config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid configuration value error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

// Allow converting from String to HwtreeError
impl From<String> for HwtreeError {
    fn from(s: String) -> Self {
        Self::Generic(s)
    }
}

// Allow converting from &str to HwtreeError
impl From<&str> for HwtreeError {
    fn from(s: &str) -> Self {
        Self::Generic(s.to_string())
    }
}
