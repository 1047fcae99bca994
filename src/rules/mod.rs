//! Rule Registry
//!
//! Declarative schemas name rules by *kind*; the registry turns a kind and
//! its parameter into a predicate.

pub mod builtin;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use anyhow::{bail, Result};

use crate::schema::Predicate;

/// Builds a predicate from the rule's optional parameter.
pub type RuleFactory =
    Arc<dyn Fn(Option<&toml::Value>) -> Result<Arc<dyn Predicate>> + Send + Sync>;

/// In-memory registry of rule kinds
#[derive(Clone)]
pub struct RuleRegistry {
    factories: HashMap<String, RuleFactory>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry preloaded with the built-in kinds
    pub fn with_builtin_rules() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Register a rule kind, replacing any kind of the same name.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(Option<&toml::Value>) -> Result<Arc<dyn Predicate>> + Send + Sync + 'static,
    {
        self.factories.insert(kind.into(), Arc::new(factory));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn list_kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Build a predicate of the given kind.
    pub fn build(&self, kind: &str, param: Option<&toml::Value>) -> Result<Arc<dyn Predicate>> {
        match self.factories.get(kind) {
            Some(factory) => factory(param),
            None => bail!("Unknown rule kind '{}'", kind),
        }
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("kinds", &self.list_kinds())
            .finish()
    }
}
