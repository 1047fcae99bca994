//! Schema Types
//!
//! A schema maps field names to the rules that guard them. Both levels keep
//! declaration order explicitly: fields are validated and reported in the
//! order they were declared, and rules run in the order they were added.

pub mod compiler;
pub mod file;
pub mod predicate;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::error::RuleError;
use crate::Record;

pub use compiler::{FieldValidator, IS_REQUIRED};
pub use file::{load_schema, parse_schema, FieldDef, LoadedSchema, RuleDef, SchemaFile};
pub use predicate::{AsyncFnRule, FnRule, Predicate, TryFnRule};

/// Rule set for a single field
#[derive(Clone, Default)]
pub struct FieldSpec {
    is_required: Option<bool>,
    rules: Vec<(String, Arc<dyn Predicate>)>,
}

impl FieldSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the field as required.
    pub fn required(self) -> Self {
        self.is_required(true)
    }

    /// Declare the `isRequired` flag explicitly.
    pub fn is_required(mut self, flag: bool) -> Self {
        self.is_required = Some(flag);
        self
    }

    /// Add a synchronous rule.
    pub fn rule<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &Record) -> bool + Send + Sync + 'static,
    {
        self.predicate(name, Arc::new(FnRule::new(f)))
    }

    /// Add a synchronous rule that may fail without a verdict.
    pub fn try_rule<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &Record) -> Result<bool, RuleError> + Send + Sync + 'static,
    {
        self.predicate(name, Arc::new(TryFnRule::new(f)))
    }

    /// Add an asynchronous rule.
    pub fn async_rule<F, Fut>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, Record) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool, RuleError>> + Send + 'static,
    {
        self.predicate(name, Arc::new(AsyncFnRule::new(f)))
    }

    /// Add a rule backed by any [`Predicate`].
    ///
    /// Re-using a rule name replaces the earlier predicate but keeps its
    /// position in the evaluation order.
    pub fn predicate(mut self, name: impl Into<String>, predicate: Arc<dyn Predicate>) -> Self {
        let name = name.into();
        match self.rules.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = predicate,
            None => self.rules.push((name, predicate)),
        }
        self
    }

    /// The `isRequired` flag, if declared.
    pub fn required_flag(&self) -> Option<bool> {
        self.is_required
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &Arc<dyn Predicate>)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// True when neither `isRequired` nor any rule was declared
    pub fn is_empty(&self) -> bool {
        self.is_required.is_none() && self.rules.is_empty()
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("is_required", &self.is_required)
            .field("rules", &self.rule_names())
            .finish()
    }
}

/// Ordered mapping from field name to [`FieldSpec`]
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, FieldSpec)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Schema::insert`].
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.insert(name, spec);
        self
    }

    /// Add a field, replacing the spec of an existing field in place.
    pub fn insert(&mut self, name: impl Into<String>, spec: FieldSpec) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = spec,
            None => self.fields.push((name, spec)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldSpec> {
        let idx = self.fields.iter().position(|(existing, _)| existing == name)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, spec)| spec)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
