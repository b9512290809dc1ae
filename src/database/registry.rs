//! Dialect and database registries
//!
//! [`DialectRegistry`] maps dialect keys to dialect implementations, and
//! [`DatabaseRegistry`] maps configured database names to their resolved
//! dialect. Both are built once at startup and passed by reference.

use crate::database::config::DatabasesConfig;
use crate::error::{QueryError, Result};
use crate::models::query_builder::dialects::{create_dialect, DatabaseBackend, SqlDialect};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Lookup table from dialect key to dialect
#[derive(Clone)]
pub struct DialectRegistry {
    dialects: HashMap<String, Arc<dyn SqlDialect>>,
}

impl DialectRegistry {
    /// Registry holding every built-in dialect under its canonical key
    pub fn new() -> Self {
        let dialects: HashMap<String, Arc<dyn SqlDialect>> = DatabaseBackend::ALL
            .iter()
            .map(|backend| (backend.key().to_string(), Arc::from(create_dialect(*backend))))
            .collect();
        Self { dialects }
    }

    /// Register a dialect, replacing any dialect with the same key
    pub fn register(&mut self, key: impl Into<String>, dialect: Arc<dyn SqlDialect>) {
        let key = key.into().to_ascii_lowercase();
        log::debug!("Registering dialect '{}' ({})", key, dialect.name());
        self.dialects.insert(key, dialect);
    }

    /// Find a dialect by key or by one of the built-in aliases
    pub fn lookup(&self, key: &str) -> Result<Arc<dyn SqlDialect>> {
        let normalized = key.trim().to_ascii_lowercase();
        if let Some(dialect) = self.dialects.get(&normalized) {
            return Ok(Arc::clone(dialect));
        }

        let backend: DatabaseBackend = normalized
            .parse()
            .map_err(|_| QueryError::UnknownDialect(key.to_string()))?;
        self.dialects
            .get(backend.key())
            .cloned()
            .ok_or_else(|| QueryError::UnknownDialect(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_ok()
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.dialects.keys().collect();
        keys.sort();
        f.debug_struct("DialectRegistry").field("dialects", &keys).finish()
    }
}

/// A configured database with its resolved dialect
#[derive(Clone)]
pub struct DatabaseEntry {
    pub name: String,
    pub dialect: Arc<dyn SqlDialect>,
    pub quote_identifiers: bool,
}

impl fmt::Debug for DatabaseEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseEntry")
            .field("name", &self.name)
            .field("dialect", &self.dialect.name())
            .field("quote_identifiers", &self.quote_identifiers)
            .finish()
    }
}

/// Registry of named databases
#[derive(Debug, Clone, Default)]
pub struct DatabaseRegistry {
    databases: IndexMap<String, DatabaseEntry>,
    default: Option<String>,
}

impl DatabaseRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every configured database with the built-in dialects
    pub fn from_config(config: &DatabasesConfig) -> Result<Self> {
        Self::from_config_with(config, &DialectRegistry::new())
    }

    /// Resolve every configured database against a dialect registry
    ///
    /// Fails on the first database whose adapter is unknown.
    pub fn from_config_with(config: &DatabasesConfig, dialects: &DialectRegistry) -> Result<Self> {
        config.validate()?;

        let default_name = config.get_default().map(|(name, _)| name.clone());
        let mut registry = Self::new();
        for (name, database) in &config.databases {
            let dialect = dialects.lookup(&database.adapter_key()?)?;
            let is_default = default_name.as_deref() == Some(name.as_str());
            registry.register(name.clone(), dialect, database.quote_identifiers, is_default);
        }

        log::debug!(
            "Database registry ready: {} database(s), default {:?}",
            registry.databases.len(),
            registry.default
        );
        Ok(registry)
    }

    /// Register a database
    ///
    /// The first registered database becomes the default unless another
    /// one is registered with `set_as_default`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        dialect: Arc<dyn SqlDialect>,
        quote_identifiers: bool,
        set_as_default: bool,
    ) {
        let name = name.into();
        self.databases.insert(
            name.clone(),
            DatabaseEntry {
                name: name.clone(),
                dialect,
                quote_identifiers,
            },
        );

        if set_as_default || self.databases.len() == 1 {
            self.default = Some(name);
        }
    }

    /// Get a database by name
    pub fn get(&self, name: &str) -> Option<&DatabaseEntry> {
        self.databases.get(name)
    }

    /// Get the default database
    pub fn get_default(&self) -> Result<&DatabaseEntry> {
        match &self.default {
            Some(name) => self
                .get(name)
                .ok_or_else(|| QueryError::UnknownDatabase(name.clone())),
            None => Err(QueryError::UnknownDatabase(
                "no default database configured".to_string(),
            )),
        }
    }

    /// The named database, or the default one for `None`
    pub fn resolve(&self, name: Option<&str>) -> Result<&DatabaseEntry> {
        match name {
            Some(name) => self
                .get(name)
                .ok_or_else(|| QueryError::UnknownDatabase(name.to_string())),
            None => self.get_default(),
        }
    }

    /// Set the default database
    pub fn set_default(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if !self.databases.contains_key(&name) {
            return Err(QueryError::UnknownDatabase(name));
        }
        self.default = Some(name);
        Ok(())
    }

    /// List all registered database names
    pub fn list_databases(&self) -> Vec<String> {
        self.databases.keys().cloned().collect()
    }

    /// Check if a database is registered
    pub fn has_database(&self, name: &str) -> bool {
        self.databases.contains_key(name)
    }

    /// Remove a database from the registry; the default cannot be removed
    pub fn remove(&mut self, name: &str) -> Result<()> {
        if self.default.as_deref() == Some(name) {
            return Err(QueryError::invalid_argument(
                "Cannot remove the default database. Set a different default first.",
            ));
        }
        self.databases
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| QueryError::UnknownDatabase(name.to_string()))
    }

    /// Clear all databases from the registry
    pub fn clear(&mut self) {
        self.databases.clear();
        self.default = None;
    }

    /// Get statistics about the registry
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            total_databases: self.databases.len(),
            default_database: self.default.clone(),
            database_names: self.list_databases(),
        }
    }
}

/// Statistics about the database registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    /// Total number of registered databases
    pub total_databases: usize,
    /// Name of the default database (if any)
    pub default_database: Option<String>,
    /// List of all database names
    pub database_names: Vec<String>,
}
