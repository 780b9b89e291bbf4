//! The formsift context
//!
//! [`FormSift`] owns the configuration, the locale catalog and the filter
//! registry. It is built once at startup and shared by reference (or in an
//! `Arc`) with everything that generates models.
//!
//! The configuration and registry live together in an immutable
//! [`Snapshot`]. Reconfiguring or registering a filter builds a new snapshot
//! from the current one and swaps it in under a write lock; callers that
//! already hold a snapshot keep using it undisturbed.

use super::callable::{FilterFn, IntoCallable};
use super::chain::{ChainExecutor, Rule};
use super::error::{ConfigError, FieldError, FieldErrors, FilterError, RegistrationError};
use super::generator::{FieldSpec, FormSource, Generator, Model};
use super::registry::FilterRegistry;
use crate::config::Config;
use crate::locale::{LocaleCatalog, LocalePack};
use serde_json::{Map, Value};
use std::sync::{Arc, RwLock};

/// An immutable configuration and the registry built from it
#[derive(Debug, Clone)]
pub struct Snapshot {
    config: Config,
    registry: FilterRegistry,
}

impl Snapshot {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn generator(&self) -> Generator<'_> {
        Generator::new(&self.registry, &self.config)
    }

    pub fn executor(&self) -> ChainExecutor<'_> {
        ChainExecutor::new(&self.registry)
    }
}

#[derive(Debug)]
struct State {
    catalog: LocaleCatalog,
    snapshot: Arc<Snapshot>,
}

/// Filtering and validation context
///
/// # Example
///
/// ```rust
/// use formsift::prelude::*;
/// use serde_json::{Map, json};
///
/// let sift = FormSift::new();
/// let required = FieldSpec::new()
///     .field("Name", "name")
///     .field("User_Name", ["rmnl", "az_lower"]);
/// let source = json!({ "Name": "Jane Doe", "User_Name": " Jane  Doe " });
///
/// let mut model = Map::new();
/// sift.generate(&mut model, &required, &FieldSpec::new(), source.as_object().unwrap())
///     .unwrap();
/// assert_eq!(model["user_name"], json!("janedoe"));
/// ```
#[derive(Debug)]
pub struct FormSift {
    state: RwLock<State>,
}

impl FormSift {
    /// Context with the default config and the bundled locale packs
    pub fn new() -> Self {
        let config = Config::default();
        let catalog = LocaleCatalog::default();
        let registry = FilterRegistry::new(&config, &catalog)
            .unwrap_or_else(|e| unreachable!("default locale is bundled: {e}"));
        Self::from_parts(config, catalog, registry)
    }

    fn from_parts(config: Config, catalog: LocaleCatalog, registry: FilterRegistry) -> Self {
        tracing::debug!(locale = %registry.locale_code(), "Initialized formsift context");
        Self {
            state: RwLock::new(State {
                catalog,
                snapshot: Arc::new(Snapshot { config, registry }),
            }),
        }
    }

    /// Context with `config` and the bundled locale packs
    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        Self::with_catalog(config, LocaleCatalog::default())
    }

    /// Context with `config` and a caller-supplied locale catalog
    pub fn with_catalog(config: Config, catalog: LocaleCatalog) -> Result<Self, ConfigError> {
        config.check()?;
        let registry = FilterRegistry::new(&config, &catalog)?;
        Ok(Self::from_parts(config, catalog, registry))
    }

    /// The current snapshot
    ///
    /// Hold on to it to run several operations against one consistent
    /// configuration.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&state.snapshot)
    }

    /// A copy of the current configuration
    pub fn config(&self) -> Config {
        self.snapshot().config.clone()
    }

    /// Set a single configuration key
    pub fn configure(&self, key: &str, value: Value) -> Result<(), ConfigError> {
        let mut patch = Map::new();
        patch.insert(key.to_string(), value);
        self.configure_all(&patch)
    }

    /// Merge several configuration keys at once
    ///
    /// Either every key is applied or, on error, none is.
    pub fn configure_all(&self, patch: &Map<String, Value>) -> Result<(), ConfigError> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let config = state.snapshot.config.merged(patch)?;
        let registry = state.snapshot.registry.rebuilt(&config, &state.catalog)?;

        tracing::info!(
            locale = %config.active_locale,
            algorithm = ?config.password_algorithm,
            cost = config.password_cost,
            "Configuration updated"
        );
        state.snapshot = Arc::new(Snapshot { config, registry });
        Ok(())
    }

    /// Make another locale pack available to `activeLocale`
    ///
    /// A pack registered under the active code replaces the active pack,
    /// unless it provides the name of a registered custom filter.
    pub fn register_locale(&self, pack: Arc<dyn LocalePack>) -> Result<(), ConfigError> {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let mut catalog = state.catalog.clone();
        catalog.register(pack);

        let config = state.snapshot.config.clone();
        let registry = state.snapshot.registry.rebuilt(&config, &catalog)?;
        state.catalog = catalog;
        state.snapshot = Arc::new(Snapshot { config, registry });
        Ok(())
    }

    /// Register a custom single-argument filter
    pub fn register_custom<F, Args>(&self, name: &str, filter: F) -> Result<(), RegistrationError>
    where
        F: IntoCallable<Args>,
    {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let mut registry = state.snapshot.registry.clone();
        registry.register_custom(name, filter)?;

        let config = state.snapshot.config.clone();
        state.snapshot = Arc::new(Snapshot { config, registry });
        Ok(())
    }

    /// Resolve a filter by name
    pub fn resolve(&self, name: &str) -> Result<FilterFn, FilterError> {
        self.snapshot().registry.resolve(name)
    }

    /// Apply a filter or chain to a single value
    pub fn apply(&self, rule: impl Into<Rule>, value: Value) -> Result<Value, FilterError> {
        let snapshot = self.snapshot();
        snapshot.executor().apply(&rule.into(), value)
    }

    /// Populate `target` from `source`, failing on the first invalid field
    ///
    /// See [`Generator::generate`].
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
        let snapshot = self.snapshot();
        snapshot.generator().generate(target, required, optional, source)
    }

    /// Populate `target` from `source`, reporting every invalid field
    ///
    /// See [`Generator::generate_collecting`].
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
        let snapshot = self.snapshot();
        snapshot
            .generator()
            .generate_collecting(target, required, optional, source)
    }
}

impl Default for FormSift {
    fn default() -> Self {
        Self::new()
    }
}
