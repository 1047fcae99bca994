//! Validation Engine
//!
//! Record validation built atop the compiled field validators, with
//! failure identifiers resolved through a message table.

pub mod engine;
pub mod messages;

use serde_json::Value;

use crate::Record;

pub use engine::{FieldErrors, UnknownFieldPolicy, Validator, ValidatorOptions};
pub use messages::{Messages, DEFAULT_MESSAGE_KEY};

/// Interpret a JSON value as a record.
///
/// `null` stands for an empty record. Any other non-object value yields
/// `None`.
pub fn record_from_value(value: Value) -> Option<Record> {
    match value {
        Value::Null => Some(Record::new()),
        Value::Object(map) => Some(map),
        _ => None,
    }
}
