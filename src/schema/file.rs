//! Schema Files
//!
//! TOML schema definitions. Rules are named by kind and resolved through a
//! [`RuleRegistry`]; `[[field]]` and `[[field.rule]]` order is preserved.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{FieldSpec, Schema};
use crate::error::SchemaError;
use crate::rules::RuleRegistry;
use crate::validation::{Messages, Validator, ValidatorOptions};

/// Root schema file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SchemaFile {
    #[serde(default)]
    pub options: ValidatorOptions,
    pub messages: Option<toml::Value>,
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldDef>,
}

/// One `[[field]]` entry
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub required: Option<bool>,
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleDef>,
}

/// One `[[field.rule]]` entry
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuleDef {
    /// Failing identifier and message key
    pub name: String,
    /// Registry kind; defaults to `name`
    pub kind: Option<String>,
    pub value: Option<toml::Value>,
}

impl RuleDef {
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(&self.name)
    }
}

/// Everything needed to build a [`Validator`]
#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub schema: Schema,
    pub messages: Messages,
    pub options: ValidatorOptions,
}

impl LoadedSchema {
    pub fn into_validator(self) -> Result<Validator, SchemaError> {
        Validator::with_options(self.schema, Some(self.messages), self.options)
    }
}

impl SchemaFile {
    /// Resolve every rule through `registry`.
    pub fn resolve(self, registry: &RuleRegistry) -> Result<LoadedSchema> {
        let mut schema = Schema::new();
        for field in self.fields {
            let mut spec = FieldSpec::new();
            if let Some(flag) = field.required {
                spec = spec.is_required(flag);
            }
            for rule in &field.rules {
                let predicate = registry
                    .build(rule.kind(), rule.value.as_ref())
                    .with_context(|| {
                        format!("Failed to build rule '{}' for field '{}'", rule.name, field.name)
                    })?;
                spec = spec.predicate(rule.name.clone(), predicate);
            }
            schema.insert(field.name, spec);
        }

        let messages = match self.messages {
            Some(value) => {
                let value = serde_json::to_value(value).context("Unreadable messages table")?;
                Messages::from_value(value)?
            }
            None => Messages::default(),
        };

        Ok(LoadedSchema {
            schema,
            messages,
            options: self.options,
        })
    }
}

/// Parse schema content from a TOML string
pub fn parse_schema(content: &str, registry: &RuleRegistry) -> Result<LoadedSchema> {
    let file: SchemaFile = toml::from_str(content).context("Failed to parse schema TOML")?;
    file.resolve(registry)
}

/// Load a schema file from disk
pub async fn load_schema(path: &Path, registry: &RuleRegistry) -> Result<LoadedSchema> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read schema file: {}", path.display()))?;

    let loaded = parse_schema(&content, registry)
        .with_context(|| format!("Invalid schema file: {}", path.display()))?;

    log::info!(
        "Loaded schema {} ({} fields)",
        path.display(),
        loaded.schema.len()
    );
    Ok(loaded)
}
