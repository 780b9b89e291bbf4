//! Configuration loading and management
//!
//! [`Config`] holds the settings consulted by the filters and the model
//! generator. It starts from defaults and is changed either by merging a
//! partial mapping (the `configure` operations of the context) or by loading
//! a complete YAML document.

use crate::core::error::ConfigError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

/// Keys accepted by [`Config::merged`]
pub const CONFIG_KEYS: [&str; 4] = [
    "raiseOnMissingRequired",
    "passwordCost",
    "passwordAlgorithm",
    "activeLocale",
];

/// Password hashing algorithm used by the `password_hash` filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordAlgorithm {
    /// bcrypt, `$2y$` hashes; `passwordCost` is the log2 work factor
    #[default]
    #[serde(alias = "default")]
    Bcrypt,

    /// argon2id, PHC string hashes; `passwordCost` is the iteration count
    Argon2id,
}

impl PasswordAlgorithm {
    /// Smallest cost the algorithm accepts
    pub fn min_cost(self) -> u32 {
        match self {
            PasswordAlgorithm::Bcrypt => 4,
            PasswordAlgorithm::Argon2id => 1,
        }
    }
}

/// Settings consulted by filters and the model generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
#[validate(schema(function = "validate_cost_for_algorithm"))]
pub struct Config {
    /// Fail generation when a required field is absent (otherwise skip it)
    pub raise_on_missing_required: bool,

    /// Work factor of the `password_hash` filter
    #[validate(range(min = 1, max = 31))]
    pub password_cost: u32,

    pub password_algorithm: PasswordAlgorithm,

    /// Code of the locale pack providing region-specific filters
    #[validate(length(min = 1))]
    pub active_locale: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raise_on_missing_required: true,
            password_cost: 12,
            password_algorithm: PasswordAlgorithm::Bcrypt,
            active_locale: "US".to_string(),
        }
    }
}

fn validate_cost_for_algorithm(config: &Config) -> Result<(), ValidationError> {
    if config.password_cost < config.password_algorithm.min_cost() {
        let mut err = ValidationError::new("password_cost");
        err.message = Some(
            format!(
                "cost {} is below the minimum of {} for {:?}",
                config.password_cost,
                config.password_algorithm.min_cost(),
                config.password_algorithm
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml_str(&content)?)
    }

    /// Load configuration from a YAML string
    ///
    /// The document is merged over the defaults exactly like a `configure`
    /// call: missing keys keep their defaults and unknown keys are rejected
    /// with [`ConfigError::UnknownConfigKey`].
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let parse_error = |message: String| ConfigError::Parse { message };

        let document: Value = if yaml.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(yaml).map_err(|e| parse_error(e.to_string()))?
        };

        match document {
            Value::Null => Self::default().merged(&Map::new()),
            Value::Object(patch) => Self::default().merged(&patch),
            _ => Err(parse_error("expected a mapping of configuration keys".to_string())),
        }
    }

    /// Return a copy with `patch` applied
    ///
    /// Only the keys in [`CONFIG_KEYS`] are recognized. The patch is applied
    /// as a whole: on error `self` is left as it was and nothing is returned.
    pub fn merged(&self, patch: &Map<String, Value>) -> Result<Self, ConfigError> {
        let mut next = self.clone();
        for (key, value) in patch {
            next.set(key, value)?;
        }
        next.check()?;
        Ok(next)
    }

    fn set(&mut self, key: &str, value: &Value) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        match key {
            "raiseOnMissingRequired" => {
                self.raise_on_missing_required =
                    value.as_bool().ok_or_else(|| invalid("expected a boolean"))?;
            }
            "passwordCost" => {
                let cost = value
                    .as_u64()
                    .ok_or_else(|| invalid("expected a positive integer"))?;
                self.password_cost =
                    u32::try_from(cost).map_err(|_| invalid("cost out of range"))?;
            }
            "passwordAlgorithm" => {
                self.password_algorithm = serde_json::from_value(value.clone())
                    .map_err(|_| invalid("expected 'bcrypt', 'argon2id' or 'default'"))?;
            }
            "activeLocale" => {
                self.active_locale = value
                    .as_str()
                    .ok_or_else(|| invalid("expected a locale code"))?
                    .to_string();
            }
            other => {
                return Err(ConfigError::UnknownConfigKey {
                    key: other.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Validate value ranges (cost bounds, non-empty locale)
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate().map_err(|errors| {
            let key = if errors.field_errors().contains_key("active_locale") {
                "activeLocale"
            } else {
                "passwordCost"
            };
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: errors.to_string(),
            }
        })
    }
}
