//! Argument validation errors.

use thiserror::Error;

/// Which rule an argument broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// A required value was absent.
    NotNull,
    /// A required collection or string was empty.
    NotEmpty,
    /// A numeric value exceeded the configured maximum.
    Maximum(u64),
    /// A value could not be parsed.
    Malformed,
}

impl core::fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValidationRule::NotNull => f.write_str("must not be null"),
            ValidationRule::NotEmpty => f.write_str("must not be empty"),
            ValidationRule::Maximum(max) => write!(f, "must not exceed {max}"),
            ValidationRule::Malformed => f.write_str("is malformed"),
        }
    }
}

/// Malformed or missing input, detected before any side effect.
///
/// The message only names the argument and the broken rule. It never depends on
/// stored state, so it cannot be used to probe which scopes exist.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("argument '{argument}' {rule}")]
pub struct ValidationError {
    argument: String,
    rule: ValidationRule,
}

impl ValidationError {
    pub fn new(argument: impl Into<String>, rule: ValidationRule) -> Self {
        Self {
            argument: argument.into(),
            rule,
        }
    }

    pub fn null(argument: impl Into<String>) -> Self {
        Self::new(argument, ValidationRule::NotNull)
    }

    pub fn empty(argument: impl Into<String>) -> Self {
        Self::new(argument, ValidationRule::NotEmpty)
    }

    pub fn too_large(argument: impl Into<String>, max: u64) -> Self {
        Self::new(argument, ValidationRule::Maximum(max))
    }

    pub fn malformed(argument: impl Into<String>) -> Self {
        Self::new(argument, ValidationRule::Malformed)
    }

    pub fn argument(&self) -> &str {
        &self.argument
    }

    pub fn rule(&self) -> ValidationRule {
        self.rule
    }
}

/// Result type for validation helpers.
pub type ValidationResult<T> = Result<T, ValidationError>;
