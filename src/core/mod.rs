//! Core module containing the filter registry, chain executor and model generator

pub mod callable;
pub mod chain;
pub mod context;
pub mod error;
pub mod generator;
pub mod registry;
pub mod value;

pub use callable::{Callable, FilterFn, IntoCallable};
pub use chain::{ChainExecutor, Rule};
pub use context::{FormSift, Snapshot};
pub use error::{
    ConfigError, FieldError, FieldErrors, FieldFailure, FilterError, FilterTier, FormError,
    RegistrationError,
};
pub use generator::{FieldSpec, FormSource, Generator, Model, normalize_key};
pub use registry::FilterRegistry;
