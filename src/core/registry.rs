//! Filter registry - resolution of filter names across three tiers
//!
//! Lookups go through the built-in filters, then the active locale pack,
//! then user-registered custom filters. The first tier that knows the name
//! wins.

use super::callable::{FilterFn, IntoCallable};
use super::error::{ConfigError, FilterError, FilterTier, RegistrationError};
use crate::config::Config;
use crate::filters::BuiltinFilters;
use crate::locale::{LocaleCatalog, LocalePack};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Registry of every filter resolvable by name
///
/// Cloning is cheap: filters are shared behind `Arc`s.
#[derive(Clone)]
pub struct FilterRegistry {
    builtins: BuiltinFilters,
    locale: Arc<dyn LocalePack>,
    custom: HashMap<String, FilterFn>,
}

impl FilterRegistry {
    /// Build a registry for `config`, taking the locale pack from `catalog`
    pub fn new(config: &Config, catalog: &LocaleCatalog) -> Result<Self, ConfigError> {
        let locale = catalog
            .get(&config.active_locale)
            .ok_or_else(|| ConfigError::UnknownLocale {
                code: config.active_locale.clone(),
            })?;

        Ok(Self {
            builtins: BuiltinFilters::new(config),
            locale,
            custom: HashMap::new(),
        })
    }

    /// Rebuild the built-in and locale tiers for a new config
    ///
    /// Custom filters are carried over. Fails if the new locale pack provides
    /// a name already taken by a custom filter.
    pub fn rebuilt(&self, config: &Config, catalog: &LocaleCatalog) -> Result<Self, ConfigError> {
        let mut next = Self::new(config, catalog)?;
        next.check_locale_collisions(&self.custom)?;
        next.custom = self.custom.clone();
        Ok(next)
    }

    fn check_locale_collisions(&self, custom: &HashMap<String, FilterFn>) -> Result<(), ConfigError> {
        let mut taken: Vec<&str> = custom
            .keys()
            .map(|s| s.as_str())
            .filter(|name| self.locale.provides(name))
            .collect();
        taken.sort_unstable();

        match taken.first() {
            Some(name) => {
                tracing::warn!(
                    filter = %name,
                    locale = %self.locale.code(),
                    "Locale pack collides with a custom filter"
                );
                Err(ConfigError::LocaleCollision {
                    code: self.locale.code().to_string(),
                    filter: name.to_string(),
                })
            }
            None => Ok(()),
        }
    }

    /// Resolve a filter name
    pub fn resolve(&self, name: &str) -> Result<FilterFn, FilterError> {
        if let Some(filter) = self.builtins.get(name) {
            return Ok(filter);
        }
        if let Some(filter) = self.locale.filter(name) {
            return Ok(filter);
        }
        if let Some(filter) = self.custom.get(name) {
            return Ok(Arc::clone(filter));
        }
        Err(FilterError::UnknownFilter {
            name: name.to_string(),
        })
    }

    /// The tier that would answer a lookup for `name`
    pub fn tier_of(&self, name: &str) -> Option<FilterTier> {
        if self.builtins.contains(name) {
            Some(FilterTier::Builtin)
        } else if self.locale.provides(name) {
            Some(FilterTier::Locale)
        } else if self.custom.contains_key(name) {
            Some(FilterTier::Custom)
        } else {
            None
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tier_of(name).is_some()
    }

    /// Register a custom filter
    ///
    /// The callable must take exactly one required argument. Names of
    /// built-in and active-locale filters are reserved; registering an
    /// existing custom name replaces it.
    pub fn register_custom<F, Args>(&mut self, name: &str, filter: F) -> Result<(), RegistrationError>
    where
        F: IntoCallable<Args>,
    {
        if name.trim().is_empty() {
            return Err(RegistrationError::InvalidName);
        }
        if let Some(tier @ (FilterTier::Builtin | FilterTier::Locale)) = self.tier_of(name) {
            return Err(RegistrationError::NameCollision {
                name: name.to_string(),
                tier,
            });
        }

        let callable = filter.into_callable();
        let (params, required) = (callable.params(), callable.required());
        let filter = callable
            .into_filter()
            .map_err(|_| RegistrationError::Arity {
                name: name.to_string(),
                params,
                required,
            })?;

        if self.custom.insert(name.to_string(), filter).is_some() {
            tracing::debug!(filter = %name, "Replaced custom filter");
        } else {
            tracing::debug!(filter = %name, "Registered custom filter");
        }
        Ok(())
    }

    /// Activate another locale pack from `catalog`
    ///
    /// On error the current pack stays active.
    pub fn set_locale(&mut self, code: &str, catalog: &LocaleCatalog) -> Result<(), ConfigError> {
        let pack = catalog.get(code).ok_or_else(|| ConfigError::UnknownLocale {
            code: code.to_string(),
        })?;
        let previous = std::mem::replace(&mut self.locale, pack);
        if let Err(e) = self.check_locale_collisions(&self.custom) {
            self.locale = previous;
            return Err(e);
        }
        tracing::debug!(locale = %self.locale.code(), "Activated locale pack");
        Ok(())
    }

    /// Code of the active locale pack
    pub fn locale_code(&self) -> &str {
        self.locale.code()
    }

    /// Names of the registered custom filters, sorted
    pub fn custom_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.custom.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Every resolvable name, grouped by tier in lookup order
    pub fn filter_names(&self) -> Vec<(FilterTier, &str)> {
        let mut names: Vec<(FilterTier, &str)> = self
            .builtins
            .names()
            .map(|n| (FilterTier::Builtin, n))
            .collect();
        names.extend(
            self.locale
                .filter_names()
                .into_iter()
                .map(|n| (FilterTier::Locale, n)),
        );
        names.extend(
            self.custom_names()
                .into_iter()
                .map(|n| (FilterTier::Custom, n)),
        );
        names
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("locale", &self.locale.code())
            .field("custom", &self.custom_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::callable::Callable;
    use serde_json::{Value, json};

    fn registry() -> FilterRegistry {
        FilterRegistry::new(&Config::default(), &LocaleCatalog::default()).unwrap()
    }

    fn upper(v: Value) -> Result<Value, String> {
        Ok(json!(v.as_str().unwrap_or_default().to_uppercase()))
    }

    #[test]
    fn test_resolve_builtin() {
        let reg = registry();
        let f = reg.resolve("az_lower").unwrap();
        assert_eq!(f(json!("AbC1")).unwrap(), json!("abc"));
        assert_eq!(reg.tier_of("az_lower"), Some(FilterTier::Builtin));
    }

    #[test]
    fn test_resolve_locale() {
        let reg = registry();
        assert_eq!(reg.tier_of("us_zipcode"), Some(FilterTier::Locale));
        assert!(reg.resolve("us_zipcode").is_ok());
        assert!(reg.resolve("ca_postal_code").is_err());
    }

    #[test]
    fn test_resolve_unknown() {
        let err = registry().resolve("nope").err().unwrap();
        assert_eq!(
            err,
            FilterError::UnknownFilter {
                name: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_register_and_resolve_custom() {
        let mut reg = registry();
        reg.register_custom("shout", upper).unwrap();

        assert_eq!(reg.tier_of("shout"), Some(FilterTier::Custom));
        assert_eq!(reg.resolve("shout").unwrap()(json!("hey")).unwrap(), json!("HEY"));
    }

    #[test]
    fn test_register_empty_name() {
        let mut reg = registry();
        assert_eq!(
            reg.register_custom("", upper),
            Err(RegistrationError::InvalidName)
        );
        assert_eq!(
            reg.register_custom("   ", upper),
            Err(RegistrationError::InvalidName)
        );
    }

    #[test]
    fn test_register_builtin_collision() {
        let mut reg = registry();
        assert_eq!(
            reg.register_custom("email", upper),
            Err(RegistrationError::NameCollision {
                name: "email".to_string(),
                tier: FilterTier::Builtin,
            })
        );
    }

    #[test]
    fn test_register_locale_collision() {
        let mut reg = registry();
        assert_eq!(
            reg.register_custom("us_phone", upper),
            Err(RegistrationError::NameCollision {
                name: "us_phone".to_string(),
                tier: FilterTier::Locale,
            })
        );
    }

    #[test]
    fn test_register_two_argument_closure() {
        let mut reg = registry();
        let err = reg
            .register_custom("pair", |a: Value, _b: Value| -> Result<Value, String> { Ok(a) })
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::Arity {
                name: "pair".to_string(),
                params: 2,
                required: 2,
            }
        );
        assert!(!reg.contains("pair"));
    }

    #[test]
    fn test_register_optional_parameters_rejected() {
        let mut reg = registry();
        let callable = Callable::from_args(3, 1, |args| Ok(args[0].clone()));
        assert!(matches!(
            reg.register_custom("bounded_name", callable),
            Err(RegistrationError::Arity { params: 3, required: 1, .. })
        ));
    }

    #[test]
    fn test_custom_last_write_wins() {
        let mut reg = registry();
        reg.register_custom("tag", |_: Value| -> Result<Value, String> { Ok(json!("first")) })
            .unwrap();
        reg.register_custom("tag", |_: Value| -> Result<Value, String> { Ok(json!("second")) })
            .unwrap();

        assert_eq!(reg.resolve("tag").unwrap()(json!(null)).unwrap(), json!("second"));
        assert_eq!(reg.custom_names(), vec!["tag"]);
    }

    #[test]
    fn test_set_locale() {
        let catalog = LocaleCatalog::default();
        let mut reg = registry();
        reg.set_locale("ca", &catalog).unwrap();

        assert_eq!(reg.locale_code(), "CA");
        assert!(reg.resolve("ca_phone").is_ok());
        assert!(reg.resolve("us_phone").is_err());
    }

    #[test]
    fn test_set_unknown_locale_keeps_current_pack() {
        let catalog = LocaleCatalog::default();
        let mut reg = registry();
        let err = reg.set_locale("FR", &catalog).unwrap_err();

        assert_eq!(
            err,
            ConfigError::UnknownLocale {
                code: "FR".to_string()
            }
        );
        assert_eq!(reg.locale_code(), "US");
    }

    #[test]
    fn test_new_with_unknown_locale() {
        let config = Config {
            active_locale: "ZZ".to_string(),
            ..Config::default()
        };
        assert!(FilterRegistry::new(&config, &LocaleCatalog::default()).is_err());
    }

    #[test]
    fn test_rebuilt_keeps_custom_filters() {
        let catalog = LocaleCatalog::default();
        let mut reg = registry();
        reg.register_custom("shout", upper).unwrap();

        let config = Config {
            active_locale: "CA".to_string(),
            ..Config::default()
        };
        let next = reg.rebuilt(&config, &catalog).unwrap();
        assert_eq!(next.locale_code(), "CA");
        assert!(next.resolve("shout").is_ok());
    }

    #[test]
    fn test_rebuilt_rejects_locale_collision() {
        let catalog = LocaleCatalog::default();
        let mut reg = registry();
        reg.register_custom("ca_phone", upper).unwrap();

        let config = Config {
            active_locale: "CA".to_string(),
            ..Config::default()
        };
        let err = reg.rebuilt(&config, &catalog).unwrap_err();
        assert_eq!(
            err,
            ConfigError::LocaleCollision {
                code: "CA".to_string(),
                filter: "ca_phone".to_string(),
            }
        );
    }

    #[test]
    fn test_set_locale_collision_keeps_current_pack() {
        let catalog = LocaleCatalog::default();
        let mut reg = registry();
        reg.register_custom("ca_postal_code", upper).unwrap();

        let err = reg.set_locale("CA", &catalog).unwrap_err();
        assert!(matches!(err, ConfigError::LocaleCollision { ref filter, .. } if filter == "ca_postal_code"));
        assert_eq!(reg.locale_code(), "US");
        assert_eq!(reg.tier_of("ca_postal_code"), Some(FilterTier::Custom));
    }

    #[test]
    fn test_filter_names_in_lookup_order() {
        let mut reg = registry();
        reg.register_custom("shout", upper).unwrap();
        let names = reg.filter_names();

        assert_eq!(names.first(), Some(&(FilterTier::Builtin, "az")));
        assert!(names.contains(&(FilterTier::Locale, "us_state_full")));
        assert_eq!(names.last(), Some(&(FilterTier::Custom, "shout")));
        assert_eq!(names.len(), 12 + 4 + 1);
    }
}
