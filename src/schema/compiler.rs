//! Field Compiler
//!
//! Turns a [`FieldSpec`] into a [`FieldValidator`]: the `isRequired` flag is
//! split from the rule predicates, and the predicates are frozen into an
//! ordered list evaluated with short-circuiting.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{FieldSpec, Predicate};
use crate::error::{SchemaError, ValidationError};
use crate::Record;

/// Failing identifier reported for a required field without a value.
pub const IS_REQUIRED: &str = "isRequired";

/// Compiled validator for one field
#[derive(Clone)]
pub struct FieldValidator {
    field: String,
    required: bool,
    rules: Vec<(String, Arc<dyn Predicate>)>,
}

impl FieldValidator {
    /// Compile a field spec.
    ///
    /// With `strict` set, a spec that declares nothing at all is rejected.
    pub fn compile(field: &str, spec: &FieldSpec, strict: bool) -> Result<Self, SchemaError> {
        if strict && spec.is_empty() {
            return Err(invalid_rules(field, "no rules declared"));
        }

        let mut rules = Vec::new();
        for (name, predicate) in spec.rules() {
            if name.is_empty() {
                return Err(invalid_rules(field, "empty rule name"));
            }
            if name == IS_REQUIRED {
                return Err(invalid_rules(
                    field,
                    "`isRequired` is reserved and cannot name a rule",
                ));
            }
            rules.push((name.to_string(), Arc::clone(predicate)));
        }

        Ok(Self {
            field: field.to_string(),
            required: spec.required_flag().unwrap_or(false),
            rules,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Validate a value, returning the identifier of the first failing rule.
    ///
    /// Values without content never reach the rule predicates.
    pub async fn validate(
        &self,
        value: Option<&Value>,
        record: &Record,
    ) -> Result<Option<&str>, ValidationError> {
        let value = match value {
            Some(value) if has_value(value) => value,
            _ => return Ok(self.required.then_some(IS_REQUIRED)),
        };

        for (name, predicate) in &self.rules {
            let passed = predicate
                .check(value, record)
                .await
                .map_err(|source| ValidationError::Rule {
                    field: self.field.clone(),
                    rule: name.clone(),
                    source,
                })?;

            log::trace!("field [{}] rule [{}] passed: {}", self.field, name, passed);
            if !passed {
                return Ok(Some(name.as_str()));
            }
        }

        Ok(None)
    }
}

impl fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValidator")
            .field("field", &self.field)
            .field("required", &self.required)
            .field(
                "rules",
                &self.rules.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A value is present unless it is `null` or the empty string.
pub fn has_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn invalid_rules(field: &str, reason: &str) -> SchemaError {
    SchemaError::InvalidRules {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
