use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

/// Error type for query building, rendering and dialect resolution
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Malformed column reference '{column}': expected 'table.column' or a wildcard")]
    MalformedColumnReference { column: String },

    #[error("Invalid use of operator {operator}: {message}")]
    InvalidOperator { operator: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Pagination not supported by {dialect}: {message}")]
    UnsupportedPagination { dialect: String, message: String },

    #[error("Unknown database dialect: {0}")]
    UnknownDialect(String),

    #[error("Database '{0}' is not configured")]
    UnknownDatabase(String),

    #[error("Identifier '{identifier}' exceeds the {dialect} limit of {max_length} characters")]
    IdentifierTooLong {
        identifier: String,
        dialect: String,
        max_length: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl QueryError {
    pub fn malformed_column(column: impl Into<String>) -> Self {
        Self::MalformedColumnReference {
            column: column.into(),
        }
    }

    pub fn invalid_operator(operator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOperator {
            operator: operator.into(),
            message: message.into(),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn unsupported_pagination(dialect: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedPagination {
            dialect: dialect.into(),
            message: message.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Get a stable error code for the error
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::MalformedColumnReference { .. } => "E_MALFORMED_COLUMN",
            QueryError::InvalidOperator { .. } => "E_INVALID_OPERATOR",
            QueryError::InvalidArgument(_) => "E_INVALID_ARGUMENT",
            QueryError::UnsupportedPagination { .. } => "E_UNSUPPORTED_PAGINATION",
            QueryError::UnknownDialect(_) => "E_UNKNOWN_DIALECT",
            QueryError::UnknownDatabase(_) => "E_UNKNOWN_DATABASE",
            QueryError::IdentifierTooLong { .. } => "E_IDENTIFIER_TOO_LONG",
            QueryError::Config(_) => "E_CONFIG",
        }
    }

    /// Whether the error was caused by the shape of the query rather than by configuration
    pub fn is_query_error(&self) -> bool {
        !matches!(
            self,
            QueryError::UnknownDialect(_) | QueryError::UnknownDatabase(_) | QueryError::Config(_)
        )
    }
}
