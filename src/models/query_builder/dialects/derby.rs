//! Apache Derby dialect implementation
//!
//! Derby offers no row-limiting syntax the builder can rely on.

use super::{Pagination, SqlDialect};

/// Derby dialect
pub struct DerbyDialect;

impl DerbyDialect {
    /// Create a new Derby dialect
    pub fn new() -> Self {
        Self
    }
}

impl Default for DerbyDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for DerbyDialect {
    fn name(&self) -> &'static str {
        "derby"
    }

    fn quote_chars(&self) -> (char, char) {
        ('"', '"')
    }

    fn placeholder(&self, _position: usize) -> String {
        "?".to_string()
    }

    fn pagination(&self) -> Pagination {
        Pagination::Unsupported
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    fn max_identifier_length(&self) -> usize {
        128
    }
}
