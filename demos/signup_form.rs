//! Validates a sign-up form with a mix of sync and async rules.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::{json, Value};

use field_validator::{FieldSpec, Messages, Record, RuleError, Schema, Validator};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let taken = Arc::new(HashSet::from(["admin", "root"].map(String::from)));

    let schema = Schema::new()
        .field(
            "username",
            FieldSpec::new()
                .required()
                .rule("minLength", |v, _| {
                    v.as_str().is_some_and(|s| s.chars().count() >= 3)
                })
                .async_rule("available", move |v: Value, _: Record| {
                    let taken = Arc::clone(&taken);
                    async move {
                        // Stand-in for a round trip to a user store
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, RuleError>(v.as_str().is_some_and(|name| !taken.contains(name)))
                    }
                }),
        )
        .field(
            "age",
            FieldSpec::new().rule("adult", |v, _| v.as_u64().is_some_and(|age| age >= 18)),
        );

    let messages = Messages::new()
        .with("isRequired", "is required")
        .with("minLength", "must be at least 3 characters")
        .with("available", "is already taken")
        .with("default", "is invalid");

    let validator = Validator::new(schema, Some(messages))?;
    println!("required: {:?}", validator.required_fields());

    for form in [
        json!({ "username": "ada", "age": 36 }),
        json!({ "username": "admin", "age": 12 }),
        json!({ "username": "", "age": 40 }),
    ] {
        let record = field_validator::validation::record_from_value(form.clone())
            .unwrap_or_default();
        let errors = validator.validate_all(&record).await?;
        println!("{} -> {}", form, serde_json::to_string(&errors)?);
    }

    Ok(())
}
