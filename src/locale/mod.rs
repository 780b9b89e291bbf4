//! Region-specific filter packs
//!
//! A locale pack exposes a fixed set of named, single-argument filters for
//! one region (phone numbers, postal codes, administrative regions). The
//! registry holds exactly one active pack; switching locale swaps the whole
//! pack.

pub mod ca;
pub mod us;

pub use ca::CaLocale;
pub use us::UsLocale;

use crate::core::callable::FilterFn;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Capability of exposing a set of named filters for one region
pub trait LocalePack: Send + Sync {
    /// The locale code (e.g. "US")
    fn code(&self) -> &str;

    /// Names of every filter this pack provides
    fn filter_names(&self) -> Vec<&'static str>;

    /// Look up a filter by name
    fn filter(&self, name: &str) -> Option<FilterFn>;

    /// Whether this pack provides `name`
    fn provides(&self, name: &str) -> bool {
        self.filter(name).is_some()
    }
}

impl fmt::Debug for dyn LocalePack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalePack")
            .field("code", &self.code())
            .finish_non_exhaustive()
    }
}

/// Catalog of the locale packs that can be activated, keyed by code
///
/// Codes are compared case-insensitively.
#[derive(Clone)]
pub struct LocaleCatalog {
    packs: HashMap<String, Arc<dyn LocalePack>>,
}

impl LocaleCatalog {
    /// Create an empty catalog
    pub fn empty() -> Self {
        Self {
            packs: HashMap::new(),
        }
    }

    /// Register a pack under its own code, replacing any previous one
    pub fn register(&mut self, pack: Arc<dyn LocalePack>) {
        let code = pack.code().to_ascii_uppercase();
        tracing::debug!(locale = %code, "Registering locale pack");
        self.packs.insert(code, pack);
    }

    /// Find the pack registered under `code`
    pub fn get(&self, code: &str) -> Option<Arc<dyn LocalePack>> {
        self.packs.get(&code.to_ascii_uppercase()).cloned()
    }

    /// All registered codes, sorted
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.packs.keys().map(|s| s.as_str()).collect();
        codes.sort_unstable();
        codes
    }
}

impl Default for LocaleCatalog {
    /// Catalog with the bundled `US` and `CA` packs
    fn default() -> Self {
        let mut catalog = Self::empty();
        catalog.register(Arc::new(UsLocale));
        catalog.register(Arc::new(CaLocale));
        catalog
    }
}

impl fmt::Debug for LocaleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleCatalog")
            .field("codes", &self.codes())
            .finish()
    }
}
