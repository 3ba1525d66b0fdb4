use super::{Table, TableSchema};
use crate::core::{DbError, Result, Row, Value};
use crate::statement::{Assignment, Condition, Scope};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Behavioural switches of the in-memory store.
#[derive(Debug, Clone, Default)]
pub struct StorageOptions {
    /// Emulates stores whose soft delete only writes the deletion marker and
    /// silently discards any other SET assignments on the statement.
    pub soft_delete_drops_assignments: bool,
}

impl StorageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn soft_delete_drops_assignments(mut self, enabled: bool) -> Self {
        self.soft_delete_drops_assignments = enabled;
        self
    }
}

pub struct InMemoryStorage {
    /// Tables with their own locks; the map lock is only held for lookups.
    tables: RwLock<HashMap<String, Arc<RwLock<Table>>>>,
    options: StorageOptions,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::with_options(StorageOptions::default())
    }

    pub fn with_options(options: StorageOptions) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            options,
        }
    }

    pub fn options(&self) -> &StorageOptions {
        &self.options
    }

    pub async fn create_table(&self, schema: TableSchema) -> Result<()> {
        let name = schema.name().to_string();
        let mut tables = self.tables.write().await;

        if tables.contains_key(&name) {
            return Err(DbError::TableExists(name));
        }

        debug!("creating table '{}'", name);
        tables.insert(name, Arc::new(RwLock::new(Table::new(schema))));
        Ok(())
    }

    pub async fn get_table(&self, name: &str) -> Result<Arc<RwLock<Table>>> {
        self.tables
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    pub async fn table_exists(&self, name: &str) -> bool {
        self.tables.read().await.contains_key(name)
    }

    pub async fn list_tables(&self) -> Vec<String> {
        self.tables.read().await.keys().cloned().collect()
    }

    pub async fn get_schema(&self, table_name: &str) -> Result<TableSchema> {
        let table_handle = self.get_table(table_name).await?;
        let table = table_handle.read().await;
        Ok(table.schema().clone())
    }

    pub async fn insert_row(&self, table_name: &str, values: &[Assignment]) -> Result<(i64, Row)> {
        let table_handle = self.get_table(table_name).await?;
        let mut table = table_handle.write().await;
        table.insert(values)
    }

    pub async fn select_rows(
        &self,
        table_name: &str,
        filters: &[Condition],
        scope: Scope,
        limit: Option<usize>,
    ) -> Result<Vec<Row>> {
        let table_handle = self.get_table(table_name).await?;
        let table = table_handle.read().await;
        table.select(filters, scope, limit)
    }

    pub async fn update_rows(
        &self,
        table_name: &str,
        filters: &[Condition],
        assignments: &[Assignment],
        scope: Scope,
    ) -> Result<usize> {
        let table_handle = self.get_table(table_name).await?;
        let mut table = table_handle.write().await;
        let updated = table.update(filters, assignments, scope)?;
        debug!("updated {} row(s) in '{}'", updated, table_name);
        Ok(updated)
    }

    pub async fn delete_rows(&self, table_name: &str, filters: &[Condition]) -> Result<usize> {
        let table_handle = self.get_table(table_name).await?;
        let mut table = table_handle.write().await;
        let deleted = table.delete(filters)?;
        debug!("deleted {} row(s) from '{}'", deleted, table_name);
        Ok(deleted)
    }

    pub async fn soft_delete_rows(
        &self,
        table_name: &str,
        filters: &[Condition],
        assignments: &[Assignment],
        marker: Value,
    ) -> Result<usize> {
        let table_handle = self.get_table(table_name).await?;
        let mut table = table_handle.write().await;
        let deleted = table.soft_delete(
            filters,
            assignments,
            marker,
            self.options.soft_delete_drops_assignments,
        )?;
        debug!("soft deleted {} row(s) in '{}'", deleted, table_name);
        Ok(deleted)
    }

    pub async fn row_count(&self, table_name: &str) -> Result<usize> {
        let table_handle = self.get_table(table_name).await?;
        let table = table_handle.read().await;
        Ok(table.row_count())
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Column, DataType};

    fn counters_schema() -> TableSchema {
        TableSchema::new(
            "counters",
            vec![
                Column::new("id", DataType::Integer).not_null(),
                Column::new("hits", DataType::Integer),
            ],
            "id",
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_create_table_twice() {
        tokio_test::block_on(async {
            let storage = InMemoryStorage::new();
            storage.create_table(counters_schema()).await.unwrap();
            let err = storage.create_table(counters_schema()).await.unwrap_err();
            assert_eq!(err, DbError::TableExists("counters".into()));
            assert!(storage.table_exists("counters").await);
        });
    }

    #[test]
    fn test_missing_table() {
        tokio_test::block_on(async {
            let storage = InMemoryStorage::new();
            let err = storage.row_count("nope").await.unwrap_err();
            assert_eq!(err, DbError::TableNotFound("nope".into()));
        });
    }

    #[test]
    fn test_soft_delete_requires_marker_column() {
        tokio_test::block_on(async {
            let storage = InMemoryStorage::new();
            storage.create_table(counters_schema()).await.unwrap();
            storage.insert_row("counters", &[]).await.unwrap();

            let err = storage
                .soft_delete_rows("counters", &[], &[], Value::Boolean(true))
                .await
                .unwrap_err();
            assert!(matches!(err, DbError::UnsupportedOperation(_)));
        });
    }
}
