use super::{ExecutionContext, Executor};
use crate::core::Result;
use crate::result::QueryResult;
use crate::statement::{Statement, UpdateStmt};

use async_trait::async_trait;

pub struct UpdateExecutor;

#[async_trait]
impl Executor for UpdateExecutor {
    fn name(&self) -> &'static str {
        "UPDATE"
    }

    fn can_handle(&self, stmt: &Statement) -> bool {
        matches!(stmt, Statement::Update(_))
    }

    async fn execute(&self, stmt: &Statement, ctx: &ExecutionContext<'_>) -> Result<QueryResult> {
        let Statement::Update(update) = stmt else {
            unreachable!();
        };

        self.execute_update(update, ctx).await
    }
}

impl UpdateExecutor {
    async fn execute_update(
        &self,
        update: &UpdateStmt,
        ctx: &ExecutionContext<'_>,
    ) -> Result<QueryResult> {
        // Filter check and write happen under one table write lock.
        let updated_count = ctx
            .storage
            .update_rows(
                &update.table_name,
                &update.filters,
                &update.assignments,
                update.scope,
            )
            .await?;

        Ok(QueryResult::updated(updated_count))
    }
}
