use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DbError {
    /// A version-conditioned write matched no row.
    ///
    /// Either the row was modified or deleted since this copy last read it,
    /// or it never existed. The two cases are not distinguished.
    #[error("Concurrent modification detected: no row matched version {expected_version}")]
    ConcurrentModification { expected_version: u64 },

    #[error("Table '{0}' already exists")]
    TableExists(String),

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Column '{0}' not found in table '{1}'")]
    ColumnNotFound(String, String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl DbError {
    pub fn is_concurrent_modification(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
