//! Field Validator
//!
//! A small, embeddable engine that checks data records against declarative
//! field schemas.
//!
//! This library provides:
//! - Schema compilation into per-field validators
//! - Sync and async rule predicates with short-circuit evaluation
//! - Required-field semantics and message resolution
//! - TOML schema files backed by a registry of rule kinds

pub mod config;
pub mod error;
pub mod rules;
pub mod schema;
pub mod validation;

/// A data record: field name to JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

// Re-exports for clean public API
pub use config::Config;
pub use error::{RuleError, SchemaError, ValidationError};
pub use rules::RuleRegistry;
pub use schema::{FieldSpec, Predicate, Schema};
pub use validation::{FieldErrors, Messages, UnknownFieldPolicy, Validator, ValidatorOptions};
