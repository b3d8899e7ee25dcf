//! Error types

use thiserror::Error;

use crate::events::PointerId;

/// Errors surfaced by nested-scroll components
///
/// Gesture handling itself never fails: protocol inconsistencies are reported
/// through [`ScrollError::InvalidPointer`] by internal helpers, then logged and
/// dropped by the caller.
#[derive(Error, Debug)]
pub enum ScrollError {
    /// Event referenced a pointer that is not part of it
    #[error("Invalid pointer id {0} in motion event")]
    InvalidPointer(PointerId),

    /// Configuration value out of range
    #[error("Invalid configuration for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Configuration could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for nested-scroll operations
pub type Result<T> = std::result::Result<T, ScrollError>;
