//! # formsift
//!
//! Declarative filtering and validation of form input into plain key-value
//! models.
//!
//! ## Features
//!
//! - **Named Filters**: Single-argument transformations looked up by name
//! - **Chains**: Apply several filters left to right, failing fast
//! - **Locale Packs**: Region-specific filters (phone, postal code, regions)
//!   swappable through configuration
//! - **Custom Filters**: Register your own closures at runtime, with the
//!   one-argument contract checked at registration
//! - **Model Generation**: Required and optional field specs, snake-cased
//!   output keys, all-or-nothing writes
//! - **Snapshot Configuration**: Reconfiguration swaps an immutable
//!   config/registry pair, safe to share across threads
//!
//! ## Quick Start
//!
//! ```rust
//! use formsift::prelude::*;
//! use serde_json::{Map, Value, json};
//!
//! let sift = FormSift::new();
//!
//! sift.register_custom("car_year", |input: Value| -> Result<Value, String> {
//!     let year = input.as_str().unwrap_or_default();
//!     if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
//!         Ok(input)
//!     } else {
//!         Err("Invalid Year entered".to_string())
//!     }
//! })?;
//!
//! let required = FieldSpec::new()
//!     .field("make", "min")
//!     .field("year", "car_year")
//!     .field("Owner Phone", "us_phone");
//! let optional = FieldSpec::new().field("notes", "paragraph");
//!
//! let form = json!({
//!     "make": " <b>Volvo</b> ",
//!     "year": "1998",
//!     "Owner Phone": "(555) 123-4567",
//!     "notes": ""
//! });
//!
//! let mut model = Map::new();
//! sift.generate(&mut model, &required, &optional, form.as_object().unwrap())?;
//!
//! assert_eq!(
//!     Value::Object(model),
//!     json!({ "make": "Volvo", "year": "1998", "owner_phone": "5551234567" })
//! );
//! # Ok::<(), FormError>(())
//! ```

pub mod config;
pub mod core;
pub mod filters;
pub mod locale;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Context ===
    pub use crate::core::{FormSift, Snapshot};

    // === Rules and Models ===
    pub use crate::core::{FieldSpec, FormSource, Model, Rule, normalize_key};

    // === Filters ===
    pub use crate::core::{Callable, ChainExecutor, FilterFn, FilterRegistry, IntoCallable};
    pub use crate::filters::name_between;

    // === Locales ===
    pub use crate::locale::{CaLocale, LocaleCatalog, LocalePack, UsLocale};

    // === Config ===
    pub use crate::config::{Config, PasswordAlgorithm};

    // === Errors ===
    pub use crate::core::{
        ConfigError, FieldError, FieldErrors, FieldFailure, FilterError, FilterTier, FormError,
        RegistrationError,
    };
}
