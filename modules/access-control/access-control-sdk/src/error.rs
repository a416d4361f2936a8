//! Error types for the access control module.

use thiserror::Error;

/// Errors raised while evaluating policies.
///
/// Denial is expressed as `Ok(false)`, never as an error. The two variants
/// carry different propagation rules in the engine:
///
/// - [`AccessError::Configuration`] is propagated in debug mode and turned
///   into a deny otherwise.
/// - [`AccessError::Runtime`] is always propagated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// Misconfiguration: missing collaborator, malformed expression,
    /// unknown policy kind, nonexistent type or method.
    #[error("{0}")]
    Configuration(String),

    /// The check could not be evaluated from the data at hand: type
    /// mismatch, missing argument, resource not found by a registered
    /// locator.
    #[error("{0}")]
    Runtime(String),
}

impl AccessError {
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    #[must_use]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime(message.into())
    }

    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    #[must_use]
    pub fn is_runtime(&self) -> bool {
        matches!(self, Self::Runtime(_))
    }
}
