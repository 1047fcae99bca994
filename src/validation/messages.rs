//! Message Table
//!
//! Resolves failing rule identifiers into human-readable messages.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// Key of the fallback message.
pub const DEFAULT_MESSAGE_KEY: &str = "default";

/// Mapping from rule name (or `default`) to message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Messages(HashMap<String, String>);

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Messages::insert`].
    pub fn with(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.insert(key, message);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.insert(key.into(), message.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Message for `key`, ignoring empty strings
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|message| !message.is_empty())
    }

    /// Build a table from a JSON-shaped value.
    ///
    /// `null` yields an empty table. Anything other than an object whose
    /// values are all strings is rejected.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            Value::Array(_) => {
                return Err(SchemaError::InvalidMessages(
                    "expected a mapping, got an array".to_string(),
                ));
            }
            other => {
                return Err(SchemaError::InvalidMessages(format!(
                    "expected a mapping, got `{}`",
                    other
                )));
            }
        };

        let mut messages = Self::default();
        for (key, message) in map {
            match message {
                Value::String(message) => messages.insert(key, message),
                other => {
                    return Err(SchemaError::InvalidMessages(format!(
                        "message for `{}` must be a string, got `{}`",
                        key, other
                    )));
                }
            }
        }
        Ok(messages)
    }

    /// Resolve a failing identifier: its own message, then the default
    /// message, then the identifier itself.
    pub fn resolve<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id)
            .or_else(|| self.get(DEFAULT_MESSAGE_KEY))
            .unwrap_or(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Messages
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, message)| (key.into(), message.into()))
                .collect(),
        )
    }
}
