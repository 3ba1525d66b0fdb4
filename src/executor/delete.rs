use super::{ExecutionContext, Executor};
use crate::core::Result;
use crate::result::QueryResult;
use crate::statement::{DeleteMode, DeleteStmt, Statement};

use async_trait::async_trait;

pub struct DeleteExecutor;

#[async_trait]
impl Executor for DeleteExecutor {
    fn name(&self) -> &'static str {
        "DELETE"
    }

    fn can_handle(&self, stmt: &Statement) -> bool {
        matches!(stmt, Statement::Delete(_))
    }

    async fn execute(&self, stmt: &Statement, ctx: &ExecutionContext<'_>) -> Result<QueryResult> {
        let Statement::Delete(delete) = stmt else {
            unreachable!();
        };

        self.execute_delete(delete, ctx).await
    }
}

impl DeleteExecutor {
    async fn execute_delete(
        &self,
        delete: &DeleteStmt,
        ctx: &ExecutionContext<'_>,
    ) -> Result<QueryResult> {
        let deleted_count = match delete.mode {
            DeleteMode::Soft => {
                let marker = ctx.soft_delete_marker();
                ctx.storage
                    .soft_delete_rows(
                        &delete.table_name,
                        &delete.filters,
                        &delete.assignments,
                        marker,
                    )
                    .await?
            }
            DeleteMode::Hard => {
                ctx.storage
                    .delete_rows(&delete.table_name, &delete.filters)
                    .await?
            }
        };

        Ok(QueryResult::deleted(deleted_count))
    }
}
