use crate::core::Value;
use crate::storage::InMemoryStorage;
use chrono::{DateTime, Utc};

/// Per-statement view of the store handed to every executor.
pub struct ExecutionContext<'a> {
    pub storage: &'a InMemoryStorage,
    /// Wall-clock time the statement started; one value per statement.
    pub started_at: DateTime<Utc>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(storage: &'a InMemoryStorage) -> Self {
        Self::at(storage, Utc::now())
    }

    pub fn at(storage: &'a InMemoryStorage, started_at: DateTime<Utc>) -> Self {
        Self {
            storage,
            started_at,
        }
    }

    /// Value written into the deletion-marker column by a soft delete.
    pub fn soft_delete_marker(&self) -> Value {
        Value::Timestamp(self.started_at)
    }
}
