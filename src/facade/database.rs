use crate::core::Result;
use crate::executor::{ExecutionContext, ExecutorPipeline};
use crate::result::QueryResult;
use crate::statement::Statement;
use crate::storage::{InMemoryStorage, StorageOptions};

/// In-memory relational store: owns the tables and dispatches statements
/// through the executor pipeline.
///
/// Each statement runs atomically against its table. There are no
/// multi-statement transactions.
pub struct Database {
    storage: InMemoryStorage,
    executor_pipeline: ExecutorPipeline,
}

impl Database {
    pub fn new() -> Self {
        Self::with_options(StorageOptions::default())
    }

    pub fn with_options(options: StorageOptions) -> Self {
        Self {
            storage: InMemoryStorage::with_options(options),
            executor_pipeline: ExecutorPipeline::with_default_executors(),
        }
    }

    pub async fn execute(&self, stmt: &Statement) -> Result<QueryResult> {
        let ctx = ExecutionContext::new(&self.storage);
        self.executor_pipeline.execute(stmt, &ctx).await
    }

    pub fn storage(&self) -> &InMemoryStorage {
        &self.storage
    }

    /// Whether soft deletes on this store discard extra SET assignments.
    pub fn soft_delete_drops_assignments(&self) -> bool {
        self.storage.options().soft_delete_drops_assignments
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
