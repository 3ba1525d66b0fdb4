use super::{ExecutionContext, Executor};
use crate::core::Result;
use crate::result::QueryResult;
use crate::statement::{InsertStmt, Statement};

use async_trait::async_trait;

pub struct InsertExecutor;

#[async_trait]
impl Executor for InsertExecutor {
    fn name(&self) -> &'static str {
        "INSERT"
    }

    fn can_handle(&self, stmt: &Statement) -> bool {
        matches!(stmt, Statement::Insert(_))
    }

    async fn execute(&self, stmt: &Statement, ctx: &ExecutionContext<'_>) -> Result<QueryResult> {
        let Statement::Insert(insert) = stmt else {
            unreachable!();
        };

        self.execute_insert(insert, ctx).await
    }
}

impl InsertExecutor {
    async fn execute_insert(
        &self,
        insert: &InsertStmt,
        ctx: &ExecutionContext<'_>,
    ) -> Result<QueryResult> {
        let schema = ctx.storage.get_schema(&insert.table_name).await?;
        let (id, row) = ctx
            .storage
            .insert_row(&insert.table_name, &insert.values)
            .await?;

        Ok(QueryResult::inserted(id, schema.schema().column_names(), row))
    }
}
