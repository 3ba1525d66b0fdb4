use super::{ExecutionContext, Executor};
use crate::core::{DbError, Result};
use crate::result::QueryResult;
use crate::statement::{CreateTableStmt, Statement};
use crate::storage::TableSchema;

use async_trait::async_trait;

pub struct CreateTableExecutor;

#[async_trait]
impl Executor for CreateTableExecutor {
    fn name(&self) -> &'static str {
        "CREATE_TABLE"
    }

    fn can_handle(&self, stmt: &Statement) -> bool {
        matches!(stmt, Statement::CreateTable(_))
    }

    async fn execute(&self, stmt: &Statement, ctx: &ExecutionContext<'_>) -> Result<QueryResult> {
        let Statement::CreateTable(create) = stmt else {
            unreachable!();
        };

        self.execute_create_table(create, ctx).await
    }
}

impl CreateTableExecutor {
    async fn execute_create_table(
        &self,
        create: &CreateTableStmt,
        ctx: &ExecutionContext<'_>,
    ) -> Result<QueryResult> {
        let schema = TableSchema::new(
            create.table_name.clone(),
            create.columns.clone(),
            create.primary_key.clone(),
            create.soft_delete_column.clone(),
        )?;

        match ctx.storage.create_table(schema).await {
            Err(DbError::TableExists(_)) if create.if_not_exists => Ok(QueryResult::empty()),
            Err(err) => Err(err),
            Ok(()) => Ok(QueryResult::empty()),
        }
    }
}
