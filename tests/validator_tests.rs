use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};

use field_validator::validation::record_from_value;
use field_validator::{
    FieldErrors, FieldSpec, Messages, Record, RuleError, Schema, SchemaError, ValidationError,
    Validator,
};

/// Helper to turn a JSON literal into a record
fn record(value: Value) -> Record {
    record_from_value(value).expect("record must be an object")
}

/// Helper recording every (value, record) pair a rule sees
fn recording_rule(
    seen: &Arc<Mutex<Vec<(Value, Record)>>>,
    verdict: bool,
) -> impl Fn(&Value, &Record) -> bool + Send + Sync + 'static {
    let seen = Arc::clone(seen);
    move |value: &Value, record: &Record| {
        seen.lock().unwrap().push((value.clone(), record.clone()));
        verdict
    }
}

fn errors(pairs: &[(&str, &str)]) -> FieldErrors {
    pairs
        .iter()
        .map(|(field, message)| (field.to_string(), message.to_string()))
        .collect()
}

#[cfg(test)]
mod construction {
    use super::*;

    #[test]
    fn test_valid_schema_builds() {
        let schema = Schema::new().field("foo", FieldSpec::new().required());
        assert!(Validator::new(schema, None).is_ok());
    }

    #[test]
    fn test_empty_schema_fails() {
        let err = Validator::new(Schema::new(), None).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidSchema));
        assert_eq!(err.to_string(), "Invalid schema");
    }

    #[test]
    fn test_invalid_messages_fail() {
        for value in [json!(1), json!([]), json!("default")] {
            let err = Messages::from_value(value).unwrap_err();
            assert!(err.to_string().starts_with("Invalid messages"));
        }
    }
}

#[cfg(test)]
mod validate_field {
    use super::*;

    #[tokio::test]
    async fn test_calls_each_rule_with_value_and_record() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let schema = Schema::new().field(
            "foo",
            FieldSpec::new()
                .rule("rule1", recording_rule(&seen, true))
                .rule("rule2", recording_rule(&seen, true)),
        );
        let validator = Validator::new(schema, None).unwrap();
        let data = record(json!({ "foo": "foo value" }));

        let result = validator.validate_field("foo", &data).await.unwrap();

        assert_eq!(result, None);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        for (value, rec) in seen.iter() {
            assert_eq!(value, &json!("foo value"));
            assert_eq!(rec, &data);
        }
    }

    #[tokio::test]
    async fn test_required_without_value_skips_rules() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let schema = Schema::new().field(
            "foo",
            FieldSpec::new()
                .required()
                .rule("rule1", recording_rule(&seen, false)),
        );
        let validator = Validator::new(schema, None).unwrap();

        let result = validator
            .validate_field("foo", &record(json!({ "foo": null })))
            .await
            .unwrap();

        assert_eq!(result.as_deref(), Some("isRequired"));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_optional_without_value_resolves_none() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let schema = Schema::new().field(
            "foo",
            FieldSpec::new().rule("rule1", recording_rule(&seen, false)),
        );
        let validator = Validator::new(schema, None).unwrap();

        for data in [json!({}), json!({ "foo": null }), json!({ "foo": "" })] {
            let result = validator.validate_field("foo", &record(data)).await.unwrap();
            assert_eq!(result, None);
        }
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_falsy_but_present_values_run_rules() {
        let schema = Schema::new().field(
            "foo",
            FieldSpec::new().required().rule("never", |_, _| false),
        );
        let validator = Validator::new(schema, None).unwrap();

        for value in [json!(0), json!(false), json!([])] {
            let result = validator
                .validate_field("foo", &record(json!({ "foo": value })))
                .await
                .unwrap();
            assert_eq!(result.as_deref(), Some("never"));
        }
    }

    #[tokio::test]
    async fn test_async_rules_are_awaited() {
        let schema = Schema::new().field(
            "foo",
            FieldSpec::new()
                .async_rule("rule1", |_, _| async { Ok::<_, RuleError>(true) })
                .async_rule("rule2", |_, _| async {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Ok::<_, RuleError>(false)
                }),
        );
        let validator = Validator::new(schema, None).unwrap();

        let result = validator
            .validate_field("foo", &record(json!({ "foo": "foo value" })))
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some("rule2"));
    }

    #[tokio::test]
    async fn test_later_rules_never_run_after_failure() {
        let third = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&third);
        let schema = Schema::new().field(
            "foo",
            FieldSpec::new()
                .rule("rule1", |_, _| true)
                .async_rule("rule2", |_, _| async { Ok::<_, RuleError>(false) })
                .rule("rule3", move |_, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    true
                }),
        );
        let validator = Validator::new(schema, None).unwrap();

        let result = validator
            .validate_field("foo", &record(json!({ "foo": 1 })))
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some("rule2"));
        assert_eq!(third.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_field_fails() {
        let schema = Schema::new().field("foo", FieldSpec::new().required());
        let validator = Validator::new(schema, None).unwrap();

        let err = validator
            .validate_field("bar", &Record::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Field [bar] not in schema");
    }

    #[tokio::test]
    async fn test_unknown_field_suppressed() {
        let schema = Schema::new().field("foo", FieldSpec::new().required());
        let validator = Validator::new(schema, None).unwrap();

        let result = validator
            .validate_field_lenient("bar", &Record::new())
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_empty_record_is_fine() {
        let schema = Schema::new().field("foo", FieldSpec::new().required());
        let validator = Validator::new(schema, None).unwrap();

        let result = validator
            .validate_field("foo", &record(Value::Null))
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some("isRequired"));
    }

    #[tokio::test]
    async fn test_async_rule_rejection_surfaces() {
        let schema = Schema::new().field(
            "email",
            FieldSpec::new().async_rule("unique", |_, _| async {
                Err::<bool, RuleError>("connection refused".into())
            }),
        );
        let validator = Validator::new(schema, None).unwrap();

        let err = validator
            .validate_field("email", &record(json!({ "email": "a@b.c" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::Rule { .. }));
        assert!(err.to_string().contains("connection refused"));
    }
}

#[cfg(test)]
mod validate_all {
    use super::*;

    #[tokio::test]
    async fn test_invalid_data_resolves_errors() {
        let schema = Schema::new()
            .field("foo", FieldSpec::new().required())
            .field("bar", FieldSpec::new().required().rule("rule1", |_, _| false));
        let validator = Validator::new(schema, None).unwrap();

        let result = validator
            .validate_all(&record(json!({ "bar": "value" })))
            .await
            .unwrap();
        assert_eq!(
            result,
            Some(errors(&[("foo", "isRequired"), ("bar", "rule1")]))
        );
    }

    #[tokio::test]
    async fn test_valid_data_resolves_none() {
        let schema = Schema::new()
            .field("foo", FieldSpec::new().required())
            .field("bar", FieldSpec::new().required().rule("rule1", |_, _| true));
        let validator = Validator::new(schema, Some(Messages::new().with("default", "bad")))
            .unwrap();

        let result = validator
            .validate_all(&record(json!({ "foo": "value", "bar": "value" })))
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_field_list_limits_validation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let schema = Schema::new()
            .field("foo", FieldSpec::new().required().rule("rule1", |_, _| false))
            .field(
                "bar",
                FieldSpec::new()
                    .required()
                    .rule("rule2", recording_rule(&seen, false)),
            );
        let validator = Validator::new(schema, None).unwrap();

        let result = validator
            .validate_fields(&["foo"], &record(json!({ "foo": "value", "bar": "value" })))
            .await
            .unwrap();
        assert_eq!(result, Some(errors(&[("foo", "rule1")])));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_record_reports_every_required_field() {
        let schema = Schema::new()
            .field("foo", FieldSpec::new().required())
            .field("bar", FieldSpec::new().required());
        let validator = Validator::new(schema, None).unwrap();

        let result = validator.validate_all(&Record::new()).await.unwrap();
        assert_eq!(
            result,
            Some(errors(&[("foo", "isRequired"), ("bar", "isRequired")]))
        );
    }

    #[tokio::test]
    async fn test_only_failing_fields_reported() {
        let schema = Schema::new()
            .field("a", FieldSpec::new().rule("positive", |v, _| v.as_i64() > Some(0)))
            .field("b", FieldSpec::new().rule("positive", |v, _| v.as_i64() > Some(0)))
            .field("c", FieldSpec::new().rule("positive", |v, _| v.as_i64() > Some(0)));
        let messages = Messages::new().with("positive", "must be positive");
        let validator = Validator::new(schema, Some(messages)).unwrap();

        let result = validator
            .validate_all(&record(json!({ "a": 1, "b": -1, "c": -2 })))
            .await
            .unwrap();
        assert_eq!(
            result,
            Some(errors(&[("b", "must be positive"), ("c", "must be positive")]))
        );
    }
}

#[cfg(test)]
mod messages {
    use super::*;

    fn failing_validator(messages: Option<Messages>) -> Validator {
        let schema = Schema::new().field("foo", FieldSpec::new().rule("rule1", |_, _| false));
        Validator::new(schema, messages).unwrap()
    }

    #[tokio::test]
    async fn test_rule_message() {
        let validator = failing_validator(Some(Messages::new().with("rule1", "rule1 message")));
        let result = validator
            .validate_field("foo", &record(json!({ "foo": "value" })))
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some("rule1 message"));
    }

    #[tokio::test]
    async fn test_default_message() {
        let validator = failing_validator(Some(Messages::new().with("default", "default message")));
        let result = validator
            .validate_field("foo", &record(json!({ "foo": "value" })))
            .await
            .unwrap();
        assert_eq!(result.as_deref(), Some("default message"));
    }

    #[tokio::test]
    async fn test_rule_name_fallback() {
        for messages in [None, Some(Messages::new())] {
            let validator = failing_validator(messages);
            let result = validator
                .validate_field("foo", &record(json!({ "foo": "value" })))
                .await
                .unwrap();
            assert_eq!(result.as_deref(), Some("rule1"));
        }
    }
}

#[test]
fn test_required_fields() {
    let schema = Schema::new()
        .field("foo", FieldSpec::new().required())
        .field("bar", FieldSpec::new().rule("rule1", |_, _| true))
        .field("baz", FieldSpec::new().required());
    let validator = Validator::new(schema, None).unwrap();

    let required = validator.required_fields();
    assert_eq!(required.len(), 2);
    assert_eq!(required.get("foo"), Some(&true));
    assert_eq!(required.get("baz"), Some(&true));
    assert!(!required.contains_key("bar"));
}

#[tokio::test]
async fn test_end_to_end() {
    let schema = Schema::new()
        .field("foo", FieldSpec::new().required())
        .field(
            "bar",
            FieldSpec::new().required().rule("min", |v, _| {
                v.as_str().is_some_and(|s| s.chars().count() >= 3)
            }),
        );
    let validator = Validator::new(schema, Some(Messages::new().with("min", "too short"))).unwrap();

    assert_eq!(
        validator
            .validate_all(&record(json!({ "foo": "ok", "bar": "ab" })))
            .await
            .unwrap(),
        Some(errors(&[("bar", "too short")]))
    );
    assert_eq!(
        validator
            .validate_all(&record(json!({ "foo": "ok", "bar": "abc" })))
            .await
            .unwrap(),
        None
    );
    assert_eq!(
        validator.validate_all(&record(json!({}))).await.unwrap(),
        Some(errors(&[("foo", "isRequired"), ("bar", "isRequired")]))
    );
}
