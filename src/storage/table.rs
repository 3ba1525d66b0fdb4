use crate::core::{Column, DataType, DbError, Result, Row, Schema, Value};
use crate::statement::{Assignment, Condition, Scope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    name: String,
    schema: Schema,
    primary_key: String,
    soft_delete_column: Option<String>,
}

impl TableSchema {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<Column>,
        primary_key: impl Into<String>,
        soft_delete_column: Option<String>,
    ) -> Result<Self> {
        let name = name.into();
        let primary_key = primary_key.into();
        let schema = Schema::new(columns);

        match schema.get_column(&primary_key) {
            Some(column) if column.data_type == DataType::Integer => {}
            Some(_) => {
                return Err(DbError::TypeMismatch(format!(
                    "Primary key '{}' of table '{}' must be INTEGER",
                    primary_key, name
                )));
            }
            None => return Err(DbError::ColumnNotFound(primary_key, name)),
        }

        if let Some(marker) = &soft_delete_column {
            match schema.get_column(marker) {
                Some(column) if column.nullable => {}
                Some(_) => {
                    return Err(DbError::ConstraintViolation(format!(
                        "Soft delete column '{}' of table '{}' must be nullable",
                        marker, name
                    )));
                }
                None => return Err(DbError::ColumnNotFound(marker.clone(), name)),
            }
        }

        Ok(Self {
            name,
            schema,
            primary_key,
            soft_delete_column,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn soft_delete_column(&self) -> Option<&str> {
        self.soft_delete_column.as_deref()
    }

    fn column_index(&self, column: &str) -> Result<usize> {
        self.schema
            .find_column_index(column)
            .ok_or_else(|| DbError::ColumnNotFound(column.to_string(), self.name.clone()))
    }
}

/// Rows keyed by primary key.
///
/// Every mutating method evaluates its filters and applies its writes under
/// the same `&mut self` borrow, so a statement is atomic with respect to any
/// other statement on the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    schema: TableSchema,
    rows: BTreeMap<i64, Row>,
    next_row_id: i64,
}

impl Table {
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: BTreeMap::new(),
            next_row_id: 1,
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Inserts one row. Unset columns take their default (or NULL); a NULL
    /// primary key is assigned the next free id.
    pub fn insert(&mut self, values: &[Assignment]) -> Result<(i64, Row)> {
        let columns = self.schema.schema().columns();
        let mut row: Row = vec![Value::Null; columns.len()];

        for assignment in values {
            let idx = self.schema.column_index(&assignment.column)?;
            row[idx] = assignment.value.clone();
        }

        for (idx, column) in columns.iter().enumerate() {
            if row[idx].is_null()
                && let Some(default) = &column.default
            {
                row[idx] = default.clone();
            }
        }

        let pk_idx = self.schema.column_index(&self.schema.primary_key)?;
        let id = match &row[pk_idx] {
            Value::Null => {
                let id = self.next_row_id;
                row[pk_idx] = Value::Integer(id);
                id
            }
            Value::Integer(id) => {
                if self.rows.contains_key(id) {
                    return Err(DbError::ConstraintViolation(format!(
                        "Duplicate primary key {} in table '{}'",
                        id,
                        self.schema.name()
                    )));
                }
                *id
            }
            other => {
                return Err(DbError::TypeMismatch(format!(
                    "Primary key '{}' expects INTEGER, got {}",
                    self.schema.primary_key,
                    other.type_name()
                )));
            }
        };

        self.validate_row(&row)?;
        self.next_row_id = self.next_row_id.max(id.saturating_add(1));
        self.rows.insert(id, row.clone());

        Ok((id, row))
    }

    pub fn select(
        &self,
        filters: &[Condition],
        scope: Scope,
        limit: Option<usize>,
    ) -> Result<Vec<Row>> {
        let filters = self.resolve_filters(filters)?;
        let matching = self
            .rows
            .values()
            .filter(|row| self.is_visible(row, scope) && Self::matches(row, &filters))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(matching)
    }

    /// Applies `assignments` to every visible row matching `filters` and
    /// returns the number of rows changed. Nothing is written if any new row
    /// fails validation.
    pub fn update(
        &mut self,
        filters: &[Condition],
        assignments: &[Assignment],
        scope: Scope,
    ) -> Result<usize> {
        let filters = self.resolve_filters(filters)?;
        let assignments = self.resolve_assignments(assignments)?;

        let mut updates = Vec::new();
        for (id, row) in &self.rows {
            if !self.is_visible(row, scope) || !Self::matches(row, &filters) {
                continue;
            }
            let mut new_row = row.clone();
            for (idx, value) in &assignments {
                new_row[*idx] = (*value).clone();
            }
            self.validate_row(&new_row)?;
            updates.push((*id, new_row));
        }

        let updated = updates.len();
        for (id, new_row) in updates {
            self.rows.insert(id, new_row);
        }
        Ok(updated)
    }

    /// Physically removes every row matching `filters`, soft-deleted or not.
    pub fn delete(&mut self, filters: &[Condition]) -> Result<usize> {
        let filters = self.resolve_filters(filters)?;
        let ids: Vec<i64> = self
            .rows
            .iter()
            .filter(|(_, row)| Self::matches(row, &filters))
            .map(|(id, _)| *id)
            .collect();

        for id in &ids {
            self.rows.remove(id);
        }
        Ok(ids.len())
    }

    /// Marks matching live rows as deleted by writing `marker` into the
    /// soft-delete column, together with `assignments`.
    ///
    /// With `drop_assignments` the extra assignments are discarded and only
    /// the marker is written.
    pub fn soft_delete(
        &mut self,
        filters: &[Condition],
        assignments: &[Assignment],
        marker: Value,
        drop_assignments: bool,
    ) -> Result<usize> {
        let Some(marker_column) = self.schema.soft_delete_column.clone() else {
            return Err(DbError::UnsupportedOperation(format!(
                "Table '{}' has no soft delete column",
                self.schema.name()
            )));
        };

        let mut writes = vec![Assignment::new(marker_column, marker)];
        if !drop_assignments {
            writes.extend(assignments.iter().cloned());
        }

        self.update(filters, &writes, Scope::Default)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn is_visible(&self, row: &Row, scope: Scope) -> bool {
        if scope == Scope::Unscoped {
            return true;
        }
        match self
            .schema
            .soft_delete_column()
            .and_then(|marker| self.schema.schema().find_column_index(marker))
        {
            Some(idx) => row[idx].is_null(),
            None => true,
        }
    }

    fn matches(row: &Row, filters: &[(usize, &Value)]) -> bool {
        filters.iter().all(|(idx, value)| &row[*idx] == *value)
    }

    fn resolve_filters<'a>(&self, filters: &'a [Condition]) -> Result<Vec<(usize, &'a Value)>> {
        filters
            .iter()
            .map(|c| Ok((self.schema.column_index(&c.column)?, &c.value)))
            .collect()
    }

    fn resolve_assignments<'a>(
        &self,
        assignments: &'a [Assignment],
    ) -> Result<Vec<(usize, &'a Value)>> {
        assignments
            .iter()
            .map(|a| {
                if a.column == self.schema.primary_key {
                    return Err(DbError::UnsupportedOperation(format!(
                        "Primary key '{}' cannot be updated",
                        a.column
                    )));
                }
                Ok((self.schema.column_index(&a.column)?, &a.value))
            })
            .collect()
    }

    fn validate_row(&self, row: &Row) -> Result<()> {
        let columns = self.schema.schema().columns();
        if row.len() != columns.len() {
            return Err(DbError::ExecutionError(format!(
                "Expected {} columns, got {}",
                columns.len(),
                row.len()
            )));
        }
        for (column, value) in columns.iter().zip(row.iter()) {
            column.validate(value)?;
        }
        Ok(())
    }
}
