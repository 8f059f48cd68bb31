//! Error types for pgfilter

use thiserror::Error;

/// Result type alias for pgfilter operations
pub type DbResult<T> = Result<T, DbError>;

/// Errors raised while building clauses or talking to the database.
///
/// Clause-building errors are raised before any statement is sent, so a
/// rejected filter or update never costs a round-trip.
#[derive(Debug, Error)]
pub enum DbError {
    /// A partial update was requested with nothing to set
    #[error("No data to update")]
    EmptyUpdate,

    /// Filter criteria contained fields outside the allowed set
    #[error("Unknown filter field(s): {}", fields.join(", "))]
    UnknownField { fields: Vec<String> },

    /// Filter criteria were non-empty but matched no allowed field
    #[error("Filterable only by: {}", allowed.join(", "))]
    NoRecognizedField { allowed: Vec<String> },

    /// A declared minimum bound exceeds its maximum bound
    #[error("{min_field} cannot be greater than {max_field}")]
    RangeConflict { min_field: String, max_field: String },

    /// A filter field has no operator bound to it (caller bug)
    #[error("No operator registered for filter field '{0}'")]
    MissingOperator(String),

    /// Input validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// NOT NULL constraint violation
    #[error("Not null violation: {0}")]
    NotNullViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl DbError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the error was caused by the caller's input.
    ///
    /// Route handlers map these to a 4xx response. `MissingOperator` is a
    /// programming error in the calling operation and is deliberately excluded.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyUpdate
                | Self::UnknownField { .. }
                | Self::NoRecognizedField { .. }
                | Self::RangeConflict { .. }
                | Self::Validation(_)
                | Self::NotFound(_)
                | Self::UniqueViolation(_)
                | Self::ForeignKeyViolation(_)
                | Self::NotNullViolation(_)
                | Self::CheckViolation(_)
        )
    }

    /// Short, stable name of the error kind (used in log events).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyUpdate => "empty_update",
            Self::UnknownField { .. } => "unknown_field",
            Self::NoRecognizedField { .. } => "no_recognized_field",
            Self::RangeConflict { .. } => "range_conflict",
            Self::MissingOperator(_) => "missing_operator",
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Connection(_) => "connection",
            Self::Query(_) => "query",
            Self::UniqueViolation(_) => "unique_violation",
            Self::ForeignKeyViolation(_) => "foreign_key_violation",
            Self::NotNullViolation(_) => "not_null_violation",
            Self::CheckViolation(_) => "check_violation",
            Self::Decode { .. } => "decode",
            #[cfg(feature = "pool")]
            Self::Pool(_) => "pool",
        }
    }

    /// Parse a tokio_postgres error into a more specific DbError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23502" => {
                    let column = db_err.column().unwrap_or("unknown");
                    return Self::NotNullViolation(format!("{}: {}", column, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for DbError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
