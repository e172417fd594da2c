//! Error types for controller construction.

use thiserror::Error;

/// Result type for controller operations.
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Errors raised while building a controller.
///
/// Faults observed while the boiler is running are not errors; they are
/// absorbed by the mode state machine (see [`crate::Fault`]).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControllerError {
    /// Boiler characteristics violate a physical or ordering constraint.
    #[error("Invalid boiler configuration: {what}")]
    InvalidConfig { what: &'static str },

    #[error("Core error: {0}")]
    Core(#[from] sb_core::CoreError),
}
