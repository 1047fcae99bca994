//! Rule Predicates
//!
//! A predicate decides whether a field value passes one rule. Synchronous
//! and asynchronous rules share the same async seam so the compiler never
//! has to tell them apart.

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RuleError;
use crate::Record;

/// A single validation rule.
///
/// `Ok(true)` passes, `Ok(false)` fails the rule, and `Err` aborts the
/// validation call that invoked it.
#[async_trait]
pub trait Predicate: Send + Sync {
    async fn check(&self, value: &Value, record: &Record) -> Result<bool, RuleError>;
}

/// Adapts an infallible synchronous closure.
pub struct FnRule<F>(F);

impl<F> FnRule<F>
where
    F: Fn(&Value, &Record) -> bool + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Predicate for FnRule<F>
where
    F: Fn(&Value, &Record) -> bool + Send + Sync,
{
    async fn check(&self, value: &Value, record: &Record) -> Result<bool, RuleError> {
        Ok((self.0)(value, record))
    }
}

/// Adapts a synchronous closure that may fail.
pub struct TryFnRule<F>(F);

impl<F> TryFnRule<F>
where
    F: Fn(&Value, &Record) -> Result<bool, RuleError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Predicate for TryFnRule<F>
where
    F: Fn(&Value, &Record) -> Result<bool, RuleError> + Send + Sync,
{
    async fn check(&self, value: &Value, record: &Record) -> Result<bool, RuleError> {
        (self.0)(value, record)
    }
}

/// Adapts a closure returning a future.
///
/// The closure receives owned copies of the value and the record so the
/// returned future can outlive the borrow of the call site.
pub struct AsyncFnRule<F>(F);

impl<F, Fut> AsyncFnRule<F>
where
    F: Fn(Value, Record) -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, RuleError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> Predicate for AsyncFnRule<F>
where
    F: Fn(Value, Record) -> Fut + Send + Sync,
    Fut: Future<Output = Result<bool, RuleError>> + Send + 'static,
{
    async fn check(&self, value: &Value, record: &Record) -> Result<bool, RuleError> {
        (self.0)(value.clone(), record.clone()).await
    }
}
