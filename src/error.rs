//! Error types for schema construction and record validation.

use thiserror::Error;

/// Error returned by a rule predicate that could not reach a verdict.
pub type RuleError = Box<dyn std::error::Error + Send + Sync>;

/// Raised while building a [`Validator`](crate::Validator).
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema declares no fields.
    #[error("Invalid schema")]
    InvalidSchema,

    /// The messages table is not a mapping of strings.
    #[error("Invalid messages: {0}")]
    InvalidMessages(String),

    /// A field's rule set is malformed.
    #[error("Invalid rules for field [{field}]: {reason}")]
    InvalidRules { field: String, reason: String },
}

/// Raised while validating a record.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Field [{0}] not in schema")]
    UnknownField(String),

    /// A rule predicate failed instead of returning a verdict.
    #[error("Rule [{rule}] on field [{field}] failed: {source}")]
    Rule {
        field: String,
        rule: String,
        #[source]
        source: RuleError,
    },
}
