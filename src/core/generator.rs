//! Model generation from form input
//!
//! The generator walks the required and optional field specs in declaration
//! order, runs each field's rule through the chain executor and writes the
//! result into the target model under a snake-cased key.
//!
//! Writes are staged: the target only sees the new values once every field
//! has passed, so a failed call leaves it untouched.

use super::chain::{ChainExecutor, Rule};
use super::error::{FieldError, FieldErrors};
use super::registry::FilterRegistry;
use super::value::is_empty;
use crate::config::Config;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Ordered mapping of source field name to rule
///
/// ```rust
/// use formsift::core::generator::FieldSpec;
///
/// let required = FieldSpec::new()
///     .field("Name", "name")
///     .field("User_Name", ["rmnl", "az_lower"]);
/// assert_eq!(required.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSpec(IndexMap<String, Rule>);

impl FieldSpec {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Add a field, keeping declaration order
    pub fn field(mut self, name: impl Into<String>, rule: impl Into<Rule>) -> Self {
        self.insert(name, rule);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, rule: impl Into<Rule>) {
        self.0.insert(name.into(), rule.into());
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, R> FromIterator<(K, R)> for FieldSpec
where
    K: Into<String>,
    R: Into<Rule>,
{
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, r)| (k.into(), r.into()))
                .collect(),
        )
    }
}

/// Source of raw form values, keyed by the original field names
pub trait FormSource {
    fn field(&self, name: &str) -> Option<&Value>;
}

impl FormSource for Map<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<S: BuildHasher> FormSource for HashMap<String, Value, S> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl FormSource for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<S: BuildHasher> FormSource for IndexMap<String, Value, S> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

/// Target object receiving the filtered values
///
/// This is the hand-off point to whatever persists the data; implement it
/// for your own model type to have fields written directly into it.
pub trait Model {
    fn set_field(&mut self, key: String, value: Value);
}

impl Model for Map<String, Value> {
    fn set_field(&mut self, key: String, value: Value) {
        self.insert(key, value);
    }
}

impl<S: BuildHasher> Model for HashMap<String, Value, S> {
    fn set_field(&mut self, key: String, value: Value) {
        self.insert(key, value);
    }
}

impl Model for BTreeMap<String, Value> {
    fn set_field(&mut self, key: String, value: Value) {
        self.insert(key, value);
    }
}

impl<S: BuildHasher> Model for IndexMap<String, Value, S> {
    fn set_field(&mut self, key: String, value: Value) {
        self.insert(key, value);
    }
}

/// Convert a form field name to the model key it is stored under
///
/// Every character outside `[A-Za-z0-9_]` becomes `_`, runs of `_` collapse
/// to one, leading and trailing `_` are dropped and the result is lowercased.
///
/// ```rust
/// use formsift::core::generator::normalize_key;
///
/// assert_eq!(normalize_key("User Name"), "user_name");
/// assert_eq!(normalize_key("--Foo__Bar--"), "foo_bar");
/// ```
pub fn normalize_key(field: &str) -> String {
    let mut key = String::with_capacity(field.len());
    for c in field.chars() {
        let c = if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' };
        if c == '_' && key.ends_with('_') {
            continue;
        }
        key.push(c);
    }
    key.trim_matches('_').to_string()
}

/// Generates models against one registry and config
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    executor: ChainExecutor<'a>,
    config: &'a Config,
}

impl<'a> Generator<'a> {
    pub fn new(registry: &'a FilterRegistry, config: &'a Config) -> Self {
        Self {
            executor: ChainExecutor::new(registry),
            config,
        }
    }

    /// Populate `target` from `source`, failing on the first invalid field
    ///
    /// Required fields that are absent (or `null`) fail with
    /// [`FieldError::MissingRequired`], unless the config disables
    /// `raise_on_missing_required`, in which case they are skipped. Optional
    /// fields that are absent or empty are skipped.
    pub fn generate<M, S>(
        &self,
        target: &mut M,
        required: &FieldSpec,
        optional: &FieldSpec,
        source: &S,
    ) -> Result<(), FieldError>
    where
        M: Model + ?Sized,
        S: FormSource + ?Sized,
    {
        let mut staged = Vec::with_capacity(required.len() + optional.len());
        for (field, rule, value) in self.plan(required, optional, source) {
            let value = value?;
            staged.push(self.run(field, rule, value)?);
        }
        commit(target, staged);
        Ok(())
    }

    /// Like [`Generator::generate`], but evaluates every field and reports
    /// all failures together
    pub fn generate_collecting<M, S>(
        &self,
        target: &mut M,
        required: &FieldSpec,
        optional: &FieldSpec,
        source: &S,
    ) -> Result<(), FieldErrors>
    where
        M: Model + ?Sized,
        S: FormSource + ?Sized,
    {
        let mut staged = Vec::with_capacity(required.len() + optional.len());
        let mut errors = Vec::new();
        for (field, rule, value) in self.plan(required, optional, source) {
            match value.and_then(|value| self.run(field, rule, value)) {
                Ok(entry) => staged.push(entry),
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            return Err(FieldErrors(errors));
        }
        commit(target, staged);
        Ok(())
    }

    /// Fields to process in order, with their raw value or the reason they
    /// cannot be processed
    fn plan<'s, S>(
        &self,
        required: &'s FieldSpec,
        optional: &'s FieldSpec,
        source: &'s S,
    ) -> Vec<(&'s str, &'s Rule, Result<&'s Value, FieldError>)>
    where
        S: FormSource + ?Sized,
    {
        let mut plan = Vec::with_capacity(required.len() + optional.len());

        for (field, rule) in required.iter() {
            match source.field(field).filter(|v| !v.is_null()) {
                Some(value) => plan.push((field, rule, Ok(value))),
                None if self.config.raise_on_missing_required => plan.push((
                    field,
                    rule,
                    Err(FieldError::MissingRequired {
                        field: field.to_string(),
                    }),
                )),
                None => {
                    tracing::warn!(field = %field, "Skipping missing required field");
                }
            }
        }

        for (field, rule) in optional.iter() {
            match source.field(field) {
                Some(value) if !is_empty(value) => plan.push((field, rule, Ok(value))),
                _ => tracing::trace!(field = %field, "Skipping empty optional field"),
            }
        }

        plan
    }

    fn run(&self, field: &str, rule: &Rule, value: &Value) -> Result<(String, Value), FieldError> {
        let output = self
            .executor
            .apply(rule, value.clone())
            .map_err(|source| FieldError::Filter {
                field: field.to_string(),
                source,
            })?;
        Ok((normalize_key(field), output))
    }
}

fn commit<M: Model + ?Sized>(target: &mut M, staged: Vec<(String, Value)>) {
    for (key, value) in staged {
        target.set_field(key, value);
    }
}
