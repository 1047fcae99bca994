//! Validation Engine
//!
//! Compiles a schema once and validates records against it, one field at a
//! time or the whole record at once.

use std::collections::{BTreeMap, HashMap};

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};

use super::messages::Messages;
use crate::error::{SchemaError, ValidationError};
use crate::schema::{FieldValidator, Schema};
use crate::Record;

/// Resolved error message per failing field
pub type FieldErrors = BTreeMap<String, String>;

/// What to do when asked to validate a field the schema does not declare
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Fail with [`ValidationError::UnknownField`].
    #[default]
    Reject,
    /// Log a warning and treat the field as valid.
    Ignore,
}

/// Engine behaviour fixed at construction time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    pub unknown_fields: UnknownFieldPolicy,
    /// Reject field specs that declare neither `isRequired` nor any rule.
    pub strict_rules: bool,
}

/// Field validation engine
#[derive(Debug, Clone)]
pub struct Validator {
    schema: Schema,
    messages: Messages,
    options: ValidatorOptions,
    validators: Vec<FieldValidator>,
    index: HashMap<String, usize>,
}

impl Validator {
    pub fn new(schema: Schema, messages: Option<Messages>) -> Result<Self, SchemaError> {
        Self::with_options(schema, messages, ValidatorOptions::default())
    }

    /// Compile every field of `schema` up front.
    pub fn with_options(
        schema: Schema,
        messages: Option<Messages>,
        options: ValidatorOptions,
    ) -> Result<Self, SchemaError> {
        if schema.is_empty() {
            return Err(SchemaError::InvalidSchema);
        }

        let validators = schema
            .iter()
            .map(|(field, spec)| FieldValidator::compile(field, spec, options.strict_rules))
            .collect::<Result<Vec<_>, _>>()?;

        let index = validators
            .iter()
            .enumerate()
            .map(|(idx, validator)| (validator.field().to_string(), idx))
            .collect();

        log::debug!("compiled {} field validators ({:?})", validators.len(), options);

        Ok(Self {
            schema,
            messages: messages.unwrap_or_default(),
            options,
            validators,
            index,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    /// Declared field names, in schema order
    pub fn field_names(&self) -> Vec<&str> {
        self.validators.iter().map(FieldValidator::field).collect()
    }

    /// Fields declared with `isRequired: true`, each mapped to `true`.
    pub fn required_fields(&self) -> BTreeMap<String, bool> {
        self.validators
            .iter()
            .filter(|validator| validator.is_required())
            .map(|validator| (validator.field().to_string(), true))
            .collect()
    }

    /// Validate one field of `record`, resolving a failure to its message.
    pub async fn validate_field(
        &self,
        field: &str,
        record: &Record,
    ) -> Result<Option<String>, ValidationError> {
        self.run_field(field, record, false).await
    }

    /// Like [`Validator::validate_field`], but an unknown field resolves to
    /// `None` whatever the engine's policy.
    pub async fn validate_field_lenient(
        &self,
        field: &str,
        record: &Record,
    ) -> Result<Option<String>, ValidationError> {
        self.run_field(field, record, true).await
    }

    /// Validate every declared field.
    ///
    /// Returns `None` when the record is valid; never an empty map.
    pub async fn validate_all(
        &self,
        record: &Record,
    ) -> Result<Option<FieldErrors>, ValidationError> {
        let fields = self.field_names();
        self.validate_fields(&fields, record).await
    }

    /// Validate the named fields only.
    ///
    /// Unknown names are reported before any rule runs. The fields are
    /// validated concurrently; the first rule error fails the whole call.
    pub async fn validate_fields<S: AsRef<str> + Sync>(
        &self,
        fields: &[S],
        record: &Record,
    ) -> Result<Option<FieldErrors>, ValidationError> {
        if self.options.unknown_fields == UnknownFieldPolicy::Reject
            && let Some(unknown) = fields
                .iter()
                .map(|field| field.as_ref())
                .find(|field| !self.index.contains_key(*field))
        {
            return Err(ValidationError::UnknownField(unknown.to_string()));
        }

        let checks = fields.iter().map(|field| async move {
            let field = field.as_ref();
            let error = self.validate_field(field, record).await?;
            Ok::<_, ValidationError>(error.map(|message| (field.to_string(), message)))
        });

        let errors: FieldErrors = try_join_all(checks).await?.into_iter().flatten().collect();

        Ok(if errors.is_empty() { None } else { Some(errors) })
    }

    /// Build a new validator from transformed copies of this one's schema
    /// and messages. The new validator is compiled from scratch and shares
    /// this one's options.
    pub fn extend<S, M>(&self, schema_fn: S, messages_fn: M) -> Result<Validator, SchemaError>
    where
        S: FnOnce(Schema) -> Schema,
        M: FnOnce(Messages) -> Messages,
    {
        Self::with_options(
            schema_fn(self.schema.clone()),
            Some(messages_fn(self.messages.clone())),
            self.options,
        )
    }

    pub fn extend_schema<S>(&self, schema_fn: S) -> Result<Validator, SchemaError>
    where
        S: FnOnce(Schema) -> Schema,
    {
        self.extend(schema_fn, |messages| messages)
    }

    pub fn extend_messages<M>(&self, messages_fn: M) -> Result<Validator, SchemaError>
    where
        M: FnOnce(Messages) -> Messages,
    {
        self.extend(|schema| schema, messages_fn)
    }

    async fn run_field(
        &self,
        field: &str,
        record: &Record,
        suppress_unknown: bool,
    ) -> Result<Option<String>, ValidationError> {
        let Some(validator) = self.index.get(field).map(|&idx| &self.validators[idx]) else {
            if suppress_unknown {
                return Ok(None);
            }
            return match self.options.unknown_fields {
                UnknownFieldPolicy::Reject => {
                    Err(ValidationError::UnknownField(field.to_string()))
                }
                UnknownFieldPolicy::Ignore => {
                    log::warn!("Field [{}] not in schema, skipping", field);
                    Ok(None)
                }
            };
        };

        let failed = validator.validate(record.get(field), record).await?;
        Ok(failed.map(|id| self.messages.resolve(id).to_string()))
    }
}
