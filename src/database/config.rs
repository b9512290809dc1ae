//! Database configuration structures and parsing
//!
//! Maps named databases to the dialect their SQL is rendered for. The URL is
//! kept for the connection pool that executes the SQL; this crate only reads
//! its scheme when no adapter is named.

use crate::error::{QueryError, Result};
use crate::models::query_builder::dialects::DatabaseBackend;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[cfg(feature = "config")]
use std::fs;
#[cfg(feature = "config")]
use std::path::Path;

/// Configuration for a single named database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConnectionConfig {
    /// Dialect key, e.g. `postgresql` or `oracle`
    #[serde(default)]
    pub adapter: Option<String>,

    /// Connection URL, used to detect the dialect when `adapter` is missing
    #[serde(default)]
    pub url: Option<String>,

    /// Whether this database should be set as the default
    #[serde(default)]
    pub is_default: bool,

    /// Quote every plain identifier in SQL rendered for this database
    #[serde(default)]
    pub quote_identifiers: bool,
}

impl DatabaseConnectionConfig {
    /// Dialect key of this database, from `adapter` or the URL scheme
    pub fn adapter_key(&self) -> Result<String> {
        if let Some(adapter) = &self.adapter {
            return Ok(adapter.trim().to_ascii_lowercase());
        }

        match &self.url {
            Some(url) => DatabaseBackend::from_url(url)
                .map(|backend| backend.key().to_string())
                .ok_or_else(|| {
                    QueryError::config(format!(
                        "Cannot detect the database adapter from URL '{}'",
                        url
                    ))
                }),
            None => Err(QueryError::config(
                "Database needs an adapter or a URL".to_string(),
            )),
        }
    }
}

/// Configuration for multiple databases
///
/// ```toml
/// default = "main"
///
/// [databases.main]
/// adapter = "postgresql"
///
/// [databases.reports]
/// url = "oracle://reports-host/REPORTS"
/// quote_identifiers = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabasesConfig {
    /// Name of the default database
    #[serde(default)]
    pub default: Option<String>,

    /// Map of database name to configuration, in file order
    #[serde(default)]
    pub databases: IndexMap<String, DatabaseConnectionConfig>,
}

impl DatabasesConfig {
    /// Create a new empty databases configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document
    #[cfg(feature = "config")]
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DatabasesConfig = toml::from_str(content)
            .map_err(|e| QueryError::config(format!("Failed to parse database config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    #[cfg(feature = "config")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let content = fs::read_to_string(path_ref).map_err(|e| {
            QueryError::config(format!(
                "Failed to read config file '{}': {}",
                path_ref.display(),
                e
            ))
        })?;

        let config = Self::from_toml_str(&content).map_err(|e| match e {
            QueryError::Config(message) => {
                QueryError::config(format!("{} ({})", message, path_ref.display()))
            }
            other => other,
        })?;

        log::debug!(
            "Loaded {} database(s) from {}",
            config.len(),
            path_ref.display()
        );
        Ok(config)
    }

    /// Add a database configuration
    pub fn add_database(&mut self, name: impl Into<String>, config: DatabaseConnectionConfig) {
        self.databases.insert(name.into(), config);
    }

    /// Get a database configuration by name
    pub fn get(&self, name: &str) -> Option<&DatabaseConnectionConfig> {
        self.databases.get(name)
    }

    /// Get the default database configuration
    ///
    /// The database named by `default` wins, then the first one marked
    /// `is_default`, then the first one configured.
    pub fn get_default(&self) -> Option<(&String, &DatabaseConnectionConfig)> {
        if let Some(name) = &self.default {
            return self.databases.get_key_value(name);
        }

        self.databases
            .iter()
            .find(|(_, config)| config.is_default)
            .or_else(|| self.databases.iter().next())
    }

    /// Check if any databases are configured
    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }

    /// Get the number of configured databases
    pub fn len(&self) -> usize {
        self.databases.len()
    }

    /// List all database names
    pub fn list_names(&self) -> Vec<String> {
        self.databases.keys().cloned().collect()
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(&mut self, other: DatabasesConfig) {
        if other.default.is_some() {
            self.default = other.default;
        }
        for (name, config) in other.databases {
            self.databases.insert(name, config);
        }
    }

    /// Check that the default exists, that at most one database is marked
    /// default and that every database names a known adapter
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.default {
            if !self.databases.contains_key(name) {
                return Err(QueryError::config(format!(
                    "Default database '{}' is not configured",
                    name
                )));
            }
        }

        let marked: Vec<&String> = self
            .databases
            .iter()
            .filter(|(_, config)| config.is_default)
            .map(|(name, _)| name)
            .collect();
        if marked.len() > 1 {
            return Err(QueryError::config(format!(
                "Several databases are marked as default: {:?}",
                marked
            )));
        }

        for (name, config) in &self.databases {
            let key = config
                .adapter_key()
                .map_err(|e| QueryError::config(format!("Database '{}': {}", name, e)))?;
            if key.parse::<DatabaseBackend>().is_err() {
                log::debug!(
                    "Database '{}' uses adapter '{}', which must be registered before use",
                    name,
                    key
                );
            }
        }

        Ok(())
    }
}

/// Builder for DatabaseConnectionConfig
#[derive(Debug, Default)]
pub struct DatabaseConnectionConfigBuilder {
    adapter: Option<String>,
    url: Option<String>,
    is_default: bool,
    quote_identifiers: bool,
}

impl DatabaseConnectionConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn adapter(mut self, adapter: impl Into<String>) -> Self {
        self.adapter = Some(adapter.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Mark as default database
    pub fn is_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn quote_identifiers(mut self, quote: bool) -> Self {
        self.quote_identifiers = quote;
        self
    }

    /// Build the configuration; either an adapter or a URL is required
    pub fn build(self) -> Result<DatabaseConnectionConfig> {
        let config = DatabaseConnectionConfig {
            adapter: self.adapter,
            url: self.url,
            is_default: self.is_default,
            quote_identifiers: self.quote_identifiers,
        };
        config.adapter_key()?;
        Ok(config)
    }
}
