use super::ExecutionContext;
use crate::core::{DbError, Result};
use crate::result::QueryResult;
use crate::statement::Statement;

use async_trait::async_trait;
use log::trace;

#[async_trait]
pub trait Executor: Send + Sync {
    /// Executor name for debugging
    fn name(&self) -> &'static str;

    fn can_handle(&self, stmt: &Statement) -> bool;
    async fn execute(&self, stmt: &Statement, ctx: &ExecutionContext<'_>) -> Result<QueryResult>;
}

pub struct ExecutorPipeline {
    executors: Vec<Box<dyn Executor>>,
}

impl ExecutorPipeline {
    pub fn new() -> Self {
        Self {
            executors: Vec::new(),
        }
    }

    /// Pipeline with one executor per statement kind.
    pub fn with_default_executors() -> Self {
        use super::ddl::CreateTableExecutor;
        use super::delete::DeleteExecutor;
        use super::dml::InsertExecutor;
        use super::query::QueryExecutor;
        use super::update::UpdateExecutor;

        let mut pipeline = Self::new();
        pipeline.register(Box::new(CreateTableExecutor));
        pipeline.register(Box::new(InsertExecutor));
        pipeline.register(Box::new(QueryExecutor));
        pipeline.register(Box::new(UpdateExecutor));
        pipeline.register(Box::new(DeleteExecutor));
        pipeline
    }

    pub fn register(&mut self, executor: Box<dyn Executor>) {
        self.executors.push(executor);
    }

    pub async fn execute(
        &self,
        stmt: &Statement,
        ctx: &ExecutionContext<'_>,
    ) -> Result<QueryResult> {
        for executor in &self.executors {
            if executor.can_handle(stmt) {
                trace!("dispatching to {} executor", executor.name());
                return executor.execute(stmt, ctx).await;
            }
        }

        Err(DbError::UnsupportedOperation(
            "No executor found for statement".into(),
        ))
    }
}

impl Default for ExecutorPipeline {
    fn default() -> Self {
        Self::new()
    }
}
