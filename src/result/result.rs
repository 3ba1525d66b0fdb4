use crate::core::{DbError, Result, Row, Value};

#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    affected_rows: usize,
    last_insert_id: Option<i64>,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            affected_rows: 0,
            last_insert_id: None,
        }
    }

    /// Result of an INSERT; carries the stored row so callers see defaults
    /// and the assigned key without a second read.
    pub fn inserted(id: i64, columns: Vec<String>, row: Row) -> Self {
        Self {
            columns,
            rows: vec![row],
            affected_rows: 1,
            last_insert_id: Some(id),
        }
    }

    pub fn updated(count: usize) -> Self {
        Self {
            affected_rows: count,
            ..Self::default()
        }
    }

    pub fn deleted(count: usize) -> Self {
        Self::updated(count)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn affected_rows(&self) -> usize {
        self.affected_rows
    }

    pub fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|row| Record {
            columns: &self.columns,
            row,
        })
    }

    pub fn first(&self) -> Option<Record<'_>> {
        self.records().next()
    }
}

/// Borrowed view of one result row with by-name column access.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    row: &'a Row,
}

impl<'a> Record<'a> {
    pub fn get(&self, column: &str) -> Result<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.row[idx])
            .ok_or_else(|| {
                DbError::ExecutionError(format!("Column '{}' not present in result", column))
            })
    }

    pub fn get_i64(&self, column: &str) -> Result<i64> {
        let value = self.get(column)?;
        value.as_i64().ok_or_else(|| mismatch(column, "INTEGER", value))
    }

    pub fn get_u64(&self, column: &str) -> Result<u64> {
        let value = self.get(column)?;
        value.as_u64().ok_or_else(|| mismatch(column, "unsigned INTEGER", value))
    }

    pub fn get_text(&self, column: &str) -> Result<String> {
        let value = self.get(column)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch(column, "TEXT", value))
    }

    pub fn row(&self) -> &'a Row {
        self.row
    }
}

fn mismatch(column: &str, expected: &str, value: &Value) -> DbError {
    DbError::TypeMismatch(format!(
        "Column '{}' expected {}, got {}",
        column,
        expected,
        value.type_name()
    ))
}
