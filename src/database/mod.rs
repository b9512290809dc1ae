//! Named database support
//!
//! Configuration of the databases SQL is rendered for, the registries that
//! resolve them to dialects, and the value type shared by all of them.

pub mod config;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use config::{DatabaseConnectionConfig, DatabaseConnectionConfigBuilder, DatabasesConfig};
pub use registry::{DatabaseEntry, DatabaseRegistry, DialectRegistry, RegistryStats};
pub use types::SqlValue;
