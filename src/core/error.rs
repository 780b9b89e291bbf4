//! Typed error handling for formsift
//!
//! Every failure the pipeline can produce is a variant of one of the leaf
//! enums below, so callers can match on the exact cause and turn it into a
//! form validation message.
//!
//! # Error Categories
//!
//! - [`FilterError`]: a filter could not be resolved or rejected its input
//! - [`FieldError`]: a field of a generation request failed
//! - [`RegistrationError`]: a custom filter could not be registered
//! - [`ConfigError`]: configuration or locale selection failed
//!
//! [`FormError`] wraps all of them for callers that want a single type.
//!
//! # Example
//!
//! ```rust,ignore
//! match sift.generate(&mut model, &required, &optional, &source) {
//!     Ok(()) => store(model),
//!     Err(FieldError::MissingRequired { field }) => {
//!         println!("Missing form value: {}", field);
//!     }
//!     Err(e) => eprintln!("Invalid form: {}", e),
//! }
//! ```

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors raised while resolving or running a filter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// No tier of the registry knows this name
    #[error("Unknown filter '{name}'")]
    UnknownFilter { name: String },

    /// The filter ran and rejected its input
    #[error("Filter '{filter}' rejected value {value}: {message}")]
    Execution {
        filter: String,
        value: Value,
        message: String,
    },
}

impl FilterError {
    /// Name of the filter this error originates from
    pub fn filter_name(&self) -> &str {
        match self {
            FilterError::UnknownFilter { name } => name,
            FilterError::Execution { filter, .. } => filter,
        }
    }
}

/// Errors attached to a single field of a generation request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// A required field is absent from the source
    #[error("Missing form value: {field}")]
    MissingRequired { field: String },

    /// The field's rule failed
    #[error("Invalid form value '{field}': {source}")]
    Filter {
        field: String,
        #[source]
        source: FilterError,
    },
}

impl FieldError {
    /// The source field name (not normalized)
    pub fn field(&self) -> &str {
        match self {
            FieldError::MissingRequired { field } => field,
            FieldError::Filter { field, .. } => field,
        }
    }
}

/// Every field failure of a collecting generation call, in declaration order
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} invalid form value(s): {}", .0.len(), join_fields(.0))]
pub struct FieldErrors(pub Vec<FieldError>);

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl FieldErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Serializable summary, one entry per failing field
    pub fn summary(&self) -> Vec<FieldFailure> {
        self.0
            .iter()
            .map(|e| FieldFailure {
                field: e.field().to_string(),
                message: e.to_string(),
            })
            .collect()
    }
}

/// A single field failure, ready to be rendered next to a form input
#[derive(Debug, Clone, Serialize)]
pub struct FieldFailure {
    pub field: String,
    pub message: String,
}

/// Tier a registered name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterTier {
    Builtin,
    Locale,
    Custom,
}

impl fmt::Display for FilterTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterTier::Builtin => write!(f, "built-in"),
            FilterTier::Locale => write!(f, "locale"),
            FilterTier::Custom => write!(f, "custom"),
        }
    }
}

/// Errors raised by custom filter registration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("An invalid filter name was declared")]
    InvalidName,

    #[error("Filter '{name}' collides with a {tier} filter")]
    NameCollision { name: String, tier: FilterTier },

    #[error(
        "Filter '{name}' declares {params} parameter(s) ({required} required); exactly one required parameter is allowed"
    )]
    Arity {
        name: String,
        params: usize,
        required: usize,
    },
}

/// Errors raised while changing configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("No locale pack registered under '{code}'")]
    UnknownLocale { code: String },

    #[error("'{key}' is not a valid configuration option")]
    UnknownConfigKey { key: String },

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Locale '{code}' provides filter '{filter}', which is already a custom filter")]
    LocaleCollision { code: String, filter: String },

    #[error("Failed to parse config: {message}")]
    Parse { message: String },
}

/// The umbrella error type for formsift
///
/// Each variant holds the more specific error of its category.
#[derive(Debug)]
pub enum FormError {
    /// Filter resolution or execution errors
    Filter(FilterError),

    /// A single field failed during generation
    Field(FieldError),

    /// Several fields failed during a collecting generation
    Fields(FieldErrors),

    /// Custom filter registration errors
    Registration(RegistrationError),

    /// Configuration errors
    Config(ConfigError),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Filter(e) => write!(f, "{}", e),
            FormError::Field(e) => write!(f, "{}", e),
            FormError::Fields(e) => write!(f, "{}", e),
            FormError::Registration(e) => write!(f, "{}", e),
            FormError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FormError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormError::Filter(e) => Some(e),
            FormError::Field(e) => Some(e),
            FormError::Fields(e) => Some(e),
            FormError::Registration(e) => Some(e),
            FormError::Config(e) => Some(e),
        }
    }
}

impl FormError {
    /// Stable error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            FormError::Filter(FilterError::UnknownFilter { .. }) => "UNKNOWN_FILTER",
            FormError::Filter(FilterError::Execution { .. }) => "FILTER_REJECTED",
            FormError::Field(FieldError::MissingRequired { .. }) => "MISSING_REQUIRED_FIELD",
            FormError::Field(FieldError::Filter { .. }) => "INVALID_FIELD",
            FormError::Fields(_) => "INVALID_FIELDS",
            FormError::Registration(RegistrationError::InvalidName) => "INVALID_FILTER_NAME",
            FormError::Registration(RegistrationError::NameCollision { .. }) => "FILTER_NAME_COLLISION",
            FormError::Registration(RegistrationError::Arity { .. }) => "FILTER_ARITY",
            FormError::Config(ConfigError::UnknownLocale { .. }) => "UNKNOWN_LOCALE",
            FormError::Config(ConfigError::UnknownConfigKey { .. }) => "UNKNOWN_CONFIG_KEY",
            FormError::Config(ConfigError::InvalidValue { .. }) => "INVALID_CONFIG_VALUE",
            FormError::Config(ConfigError::LocaleCollision { .. }) => "LOCALE_FILTER_COLLISION",
            FormError::Config(ConfigError::Parse { .. }) => "CONFIG_PARSE_ERROR",
        }
    }

    /// Per-field failures, if this error concerns form fields
    pub fn field_failures(&self) -> Vec<FieldFailure> {
        match self {
            FormError::Field(e) => vec![FieldFailure {
                field: e.field().to_string(),
                message: e.to_string(),
            }],
            FormError::Fields(errors) => errors.summary(),
            _ => Vec::new(),
        }
    }
}

impl From<FilterError> for FormError {
    fn from(err: FilterError) -> Self {
        FormError::Filter(err)
    }
}

impl From<FieldError> for FormError {
    fn from(err: FieldError) -> Self {
        FormError::Field(err)
    }
}

impl From<FieldErrors> for FormError {
    fn from(err: FieldErrors) -> Self {
        FormError::Fields(err)
    }
}

impl From<RegistrationError> for FormError {
    fn from(err: RegistrationError) -> Self {
        FormError::Registration(err)
    }
}

impl From<ConfigError> for FormError {
    fn from(err: ConfigError) -> Self {
        FormError::Config(err)
    }
}
