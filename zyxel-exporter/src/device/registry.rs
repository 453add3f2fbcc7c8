//! Registry mapping product models to dialects.

use std::sync::Arc;

use indexmap::IndexMap;

use super::Dialect;
use super::vendors::{Vmg1312B10d, Vmg1312T20b};
use crate::error::{DeviceError, Result};

/// Lookup table from product model identifier to dialect.
///
/// Models that are reported but not registered fall back to the default
/// dialect, since most firmware builds share its command set.
#[derive(Clone)]
pub struct DialectRegistry {
    dialects: IndexMap<String, Arc<dyn Dialect>>,
    default: Arc<dyn Dialect>,
}

impl DialectRegistry {
    /// Create an empty registry with the given fallback dialect.
    pub fn new(default: Arc<dyn Dialect>) -> Self {
        Self {
            dialects: IndexMap::new(),
            default,
        }
    }

    /// Registry with the built-in dialects; VMG1312-B10D is the fallback.
    pub fn builtin() -> Self {
        let b10d: Arc<dyn Dialect> = Arc::new(Vmg1312B10d);
        let mut registry = Self::new(b10d.clone());
        registry.dialects.insert(b10d.name().to_string(), b10d);
        registry
            .dialects
            .insert(Vmg1312T20b.name().to_string(), Arc::new(Vmg1312T20b));
        registry
    }

    /// Register a dialect under its own model name.
    pub fn register(&mut self, dialect: Arc<dyn Dialect>) -> Result<()> {
        self.register_as(dialect.name(), dialect)
    }

    /// Register a dialect under an additional model name.
    pub fn register_as(&mut self, model: &str, dialect: Arc<dyn Dialect>) -> Result<()> {
        if self.dialects.contains_key(model) {
            return Err(DeviceError::AlreadyRegistered {
                model: model.to_string(),
            }
            .into());
        }
        self.dialects.insert(model.to_string(), dialect);
        Ok(())
    }

    /// Dialect for a reported model, or the default.
    pub fn lookup(&self, model: &str) -> Arc<dyn Dialect> {
        self.get(model).unwrap_or_else(|| self.default.clone())
    }

    /// Dialect registered for exactly this model.
    pub fn get(&self, model: &str) -> Option<Arc<dyn Dialect>> {
        self.dialects.get(model.trim()).cloned()
    }

    /// Check if a model is registered.
    pub fn contains(&self, model: &str) -> bool {
        self.dialects.contains_key(model.trim())
    }

    /// List all registered model names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dialects.keys().map(String::as_str)
    }

    /// The fallback dialect.
    pub fn default_dialect(&self) -> &dyn Dialect {
        self.default.as_ref()
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
