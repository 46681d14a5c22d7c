//! Error types for sqlcraft.

use thiserror::Error;

/// The main error type for building and compiling queries.
///
/// Errors are `Clone` so a builder can keep the first failure it saw and
/// hand it back from `compile`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    /// Unknown dialect code or unusable compiler configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The clause tree cannot be turned into a statement.
    #[error("Structural error: {0}")]
    Structural(String),

    /// A DDL definition violates a table rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The target dialect cannot express the requested construct.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Invalid operator.
    #[error("Invalid operator: '{0}'")]
    InvalidOperator(String),

    /// Variable lookup reached the root scope without a match.
    #[error("Undefined variable: '{0}'")]
    UndefinedVariable(String),
}

impl CraftError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }
}

/// Result type alias for sqlcraft operations.
pub type CraftResult<T> = Result<T, CraftError>;
