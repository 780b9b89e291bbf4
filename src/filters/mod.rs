//! Built-in filters
//!
//! Every filter takes one [`serde_json::Value`] and returns the transformed
//! value or a rejection message. Unless stated otherwise the input is first
//! coerced to text (see [`crate::core::value::to_text`]).

pub mod format;
pub mod password;
pub mod text;

pub use format::{cast_int, email, normalize_date};
pub use password::password_hash;
pub use text::{az, az_lower, az_upper, business_name, min, name, name_between, paragraph, rmnl};

use crate::config::Config;
use crate::core::callable::FilterFn;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

/// Compile a filter pattern once and cache it in `cell`
pub(crate) fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static filter pattern"))
}

/// Names of every built-in filter
pub const BUILTIN_FILTERS: [&str; 12] = [
    "az",
    "az_lower",
    "az_upper",
    "business_name",
    "cast_int",
    "email",
    "min",
    "name",
    "normalize_date",
    "paragraph",
    "password_hash",
    "rmnl",
];

/// The compiled-in filter tier
///
/// Built from a [`Config`] because `password_hash` depends on the configured
/// algorithm and cost.
#[derive(Clone)]
pub struct BuiltinFilters {
    filters: BTreeMap<&'static str, FilterFn>,
}

impl BuiltinFilters {
    pub fn new(config: &Config) -> Self {
        let mut filters: BTreeMap<&'static str, FilterFn> = BTreeMap::new();
        filters.insert("az", Arc::new(az));
        filters.insert("az_lower", Arc::new(az_lower));
        filters.insert("az_upper", Arc::new(az_upper));
        filters.insert("business_name", Arc::new(business_name));
        filters.insert("cast_int", Arc::new(cast_int));
        filters.insert("email", Arc::new(email));
        filters.insert("min", Arc::new(min));
        filters.insert("name", Arc::new(name));
        filters.insert("normalize_date", Arc::new(normalize_date));
        filters.insert("paragraph", Arc::new(paragraph));
        filters.insert("password_hash", Arc::new(password_hash(config)));
        filters.insert("rmnl", Arc::new(rmnl));
        Self { filters }
    }

    pub fn get(&self, name: &str) -> Option<FilterFn> {
        self.filters.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.filters.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_regex_is_compiled_once() {
        static RE: OnceLock<Regex> = OnceLock::new();
        let first = regex(&RE, r"^[0-9]+$");
        let second = regex(&RE, r"^[0-9]+$");

        assert!(std::ptr::eq(first, second));
        assert!(first.is_match("2024"));
    }

    #[test]
    fn test_builtin_table_matches_names() {
        let builtins = BuiltinFilters::new(&Config::default());
        let names: Vec<&str> = builtins.names().collect();
        assert_eq!(names, BUILTIN_FILTERS.to_vec());
    }

    #[test]
    fn test_locale_filters_are_not_builtins() {
        let builtins = BuiltinFilters::new(&Config::default());
        assert!(!builtins.contains("us_phone"));
        assert!(builtins.get("us_zipcode").is_none());
    }

    #[test]
    fn test_builtin_lookup_runs_filter() {
        let builtins = BuiltinFilters::new(&Config::default());
        let rmnl = builtins.get("rmnl").unwrap();
        assert_eq!(rmnl(json!(" a \n b ")).unwrap(), json!("a b"));
    }
}
