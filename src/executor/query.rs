use super::{ExecutionContext, Executor};
use crate::core::Result;
use crate::result::QueryResult;
use crate::statement::{QueryStmt, Statement};

use async_trait::async_trait;

pub struct QueryExecutor;

#[async_trait]
impl Executor for QueryExecutor {
    fn name(&self) -> &'static str {
        "QUERY"
    }

    fn can_handle(&self, stmt: &Statement) -> bool {
        matches!(stmt, Statement::Query(_))
    }

    async fn execute(&self, stmt: &Statement, ctx: &ExecutionContext<'_>) -> Result<QueryResult> {
        let Statement::Query(query) = stmt else {
            unreachable!();
        };

        self.execute_query(query, ctx).await
    }
}

impl QueryExecutor {
    async fn execute_query(
        &self,
        query: &QueryStmt,
        ctx: &ExecutionContext<'_>,
    ) -> Result<QueryResult> {
        let schema = ctx.storage.get_schema(&query.table_name).await?;
        let rows = ctx
            .storage
            .select_rows(&query.table_name, &query.filters, query.scope, query.limit)
            .await?;

        Ok(QueryResult::new(schema.schema().column_names(), rows))
    }
}
