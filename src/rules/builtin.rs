//! Built-in rule kinds.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde_json::Value;

use super::RuleRegistry;
use crate::schema::{FnRule, Predicate};
use crate::Record;

/// Register every built-in kind.
pub fn register_all(registry: &mut RuleRegistry) {
    registry.register("min_length", |param| {
        let min = length_param("min_length", param)?;
        Ok(rule(move |value| length(value).is_some_and(|len| len >= min)))
    });
    registry.register("max_length", |param| {
        let max = length_param("max_length", param)?;
        Ok(rule(move |value| length(value).is_some_and(|len| len <= max)))
    });
    registry.register("min", |param| {
        let min = number_param("min", param)?;
        Ok(rule(move |value| number(value).is_some_and(|n| n >= min)))
    });
    registry.register("max", |param| {
        let max = number_param("max", param)?;
        Ok(rule(move |value| number(value).is_some_and(|n| n <= max)))
    });
    registry.register("pattern", |param| {
        let source = param
            .and_then(toml::Value::as_str)
            .ok_or_else(|| anyhow!("Rule kind 'pattern' expects a string `value`"))?;
        let regex = Regex::new(source).with_context(|| format!("Invalid pattern '{}'", source))?;
        Ok(rule(move |value| value.as_str().is_some_and(|s| regex.is_match(s))))
    });
    registry.register("one_of", |param| {
        let allowed = match param {
            Some(toml::Value::Array(items)) => items
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<Value>, _>>()
                .context("Rule kind 'one_of' has an unrepresentable value")?,
            _ => anyhow::bail!("Rule kind 'one_of' expects an array `value`"),
        };
        Ok(rule(move |value| allowed.iter().any(|candidate| same_value(candidate, value))))
    });
    registry.register("integer", |_| {
        Ok(rule(|value| value.is_i64() || value.is_u64()))
    });
}

fn rule<F>(check: F) -> Arc<dyn Predicate>
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Arc::new(FnRule::new(move |value: &Value, _: &Record| check(value)))
}

/// Length of a string (in chars) or an array
fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Numeric view of a number or a numeric string
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Equality where `1` and `1.0` are the same number
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

fn length_param(kind: &str, param: Option<&toml::Value>) -> Result<usize> {
    param
        .and_then(toml::Value::as_integer)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| anyhow!("Rule kind '{}' expects a non-negative integer `value`", kind))
}

fn number_param(kind: &str, param: Option<&toml::Value>) -> Result<f64> {
    match param {
        Some(toml::Value::Integer(n)) => Ok(*n as f64),
        Some(toml::Value::Float(n)) => Ok(*n),
        _ => Err(anyhow!("Rule kind '{}' expects a numeric `value`", kind)),
    }
}
