//! Filter rules and the chain executor

use super::error::FilterError;
use super::registry::FilterRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Filters whose input must never appear in errors or logs
const SENSITIVE_FILTERS: [&str; 1] = ["password_hash"];

const REDACTED: &str = "[redacted]";

/// The filter(s) applied to one field
///
/// Deserializes from either a string or a list of strings:
///
/// ```rust
/// use formsift::core::chain::Rule;
///
/// let single: Rule = serde_json::from_str(r#""email""#).unwrap();
/// let chain: Rule = serde_json::from_str(r#"["rmnl", "az_lower"]"#).unwrap();
/// assert_eq!(single, Rule::from("email"));
/// assert_eq!(chain, Rule::from(["rmnl", "az_lower"]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rule {
    Single(String),
    Chain(Vec<String>),
}

impl Rule {
    /// Filter names in application order
    pub fn names(&self) -> &[String] {
        match self {
            Rule::Single(name) => std::slice::from_ref(name),
            Rule::Chain(names) => names,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().join(" | "))
    }
}

impl From<&str> for Rule {
    fn from(name: &str) -> Self {
        Rule::Single(name.to_string())
    }
}

impl From<String> for Rule {
    fn from(name: String) -> Self {
        Rule::Single(name)
    }
}

impl<const N: usize> From<[&str; N]> for Rule {
    fn from(names: [&str; N]) -> Self {
        Rule::Chain(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<Vec<&str>> for Rule {
    fn from(names: Vec<&str>) -> Self {
        Rule::Chain(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Rule {
    fn from(names: Vec<String>) -> Self {
        Rule::Chain(names)
    }
}

/// Applies rules against a registry
#[derive(Debug, Clone, Copy)]
pub struct ChainExecutor<'a> {
    registry: &'a FilterRegistry,
}

impl<'a> ChainExecutor<'a> {
    pub fn new(registry: &'a FilterRegistry) -> Self {
        Self { registry }
    }

    /// Apply a rule to `value`
    ///
    /// Each filter's output is the next filter's input. The first failure
    /// stops the chain; there is no partial result. An empty chain returns
    /// `value` unchanged.
    pub fn apply(&self, rule: &Rule, value: Value) -> Result<Value, FilterError> {
        rule.names()
            .iter()
            .try_fold(value, |value, name| self.apply_one(name, value))
    }

    /// Resolve and apply a single filter
    pub fn apply_one(&self, name: &str, value: Value) -> Result<Value, FilterError> {
        let filter = self.registry.resolve(name)?;
        let input = if SENSITIVE_FILTERS.contains(&name) {
            None
        } else {
            Some(value.clone())
        };

        filter(value).map_err(|message| {
            let value = input.unwrap_or_else(|| Value::String(REDACTED.to_string()));
            tracing::debug!(filter = %name, value = %value, reason = %message, "Filter rejected value");
            FilterError::Execution {
                filter: name.to_string(),
                value,
                message,
            }
        })
    }
}
