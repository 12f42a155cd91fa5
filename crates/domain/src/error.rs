//! Unified error types for the domain layer
//!
//! Provides a common error type that can be used across all domain operations,
//! enabling consistent error handling without forcing adapters to use String or anyhow.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Identifier does not match the region id grammar
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Identifier is reserved for the implicit whole-world region
    #[error("The identifier '{0}' is reserved")]
    ReservedIdentifier(String),

    /// Raw text could not be parsed into a value for the flag
    #[error("Invalid value for flag '{flag}': {reason}")]
    InvalidFlagFormat { flag: String, reason: String },

    /// The flag has no group sub-flag
    #[error("Region flag '{0}' does not have a group flag")]
    NoGroupFlag(String),

    /// No flag with that name exists in the registry
    #[error("Unknown flag: {0}")]
    UnknownFlag(String),

    /// Setting the parent would make a region its own ancestor
    #[error("Setting the parent of '{child}' to '{parent}' would create circular inheritance")]
    Cycle { child: String, parent: String },

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(id: impl Into<String>) -> Self {
        Self::InvalidIdentifier(id.into())
    }

    /// Create a reserved identifier error
    pub fn reserved_identifier(id: impl Into<String>) -> Self {
        Self::ReservedIdentifier(id.into())
    }

    /// Creates an invalid flag format error carrying the parser's reason.
    ///
    /// # Example
    /// ```ignore
    /// return Err(DomainError::invalid_flag_format("pvp", "Expected none/allow/deny but got 'maybe'"));
    /// ```
    pub fn invalid_flag_format(flag: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFlagFormat {
            flag: flag.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing group flag error
    pub fn no_group_flag(flag: impl Into<String>) -> Self {
        Self::NoGroupFlag(flag.into())
    }

    /// Create an unknown flag error
    pub fn unknown_flag(name: impl Into<String>) -> Self {
        Self::UnknownFlag(name.into())
    }

    /// Create a circular inheritance error
    pub fn cycle(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::Cycle {
            child: child.into(),
            parent: parent.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
