//! Error types for the well-swarm core.
//!
//! Only construction and configuration can fail. The per-tick numeric path
//! is total and never returns an error.

use thiserror::Error;

/// Errors produced while building or reconfiguring a simulation.
#[derive(Debug, Error)]
pub enum SwarmError {
    /// Canvas width or height was zero, negative, or not finite.
    #[error("invalid dimensions: width and height must be finite and positive")]
    InvalidDimensions,

    /// A configuration value was outside its valid range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl SwarmError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        SwarmError::InvalidParameter {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
