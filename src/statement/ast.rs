use crate::core::{Column, Value};

/// Statements understood by the executor pipeline.
#[derive(Debug, Clone)]
pub enum Statement {
    CreateTable(CreateTableStmt),
    Insert(InsertStmt),
    Query(QueryStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
}

/// Which rows a statement may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Soft-deleted rows are invisible.
    #[default]
    Default,
    /// Every stored row is visible, soft-deleted or not.
    Unscoped,
}

/// How a DELETE removes rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Sets the table's deletion-marker column; the row stays in storage.
    Soft,
    /// Physically removes the row.
    Hard,
}

/// `column = value` equality filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub value: Value,
}

impl Condition {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// `SET column = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Value,
}

impl Assignment {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// CREATE TABLE statement
#[derive(Debug, Clone)]
pub struct CreateTableStmt {
    pub table_name: String,
    pub columns: Vec<Column>,
    /// Integer column holding the row identity; assigned on insert when NULL.
    pub primary_key: String,
    /// Nullable column whose non-NULL value marks a row as soft-deleted.
    pub soft_delete_column: Option<String>,
    pub if_not_exists: bool,
}

/// INSERT statement (single row, named columns)
#[derive(Debug, Clone)]
pub struct InsertStmt {
    pub table_name: String,
    pub values: Vec<Assignment>,
}

/// SELECT statement with equality filters
#[derive(Debug, Clone)]
pub struct QueryStmt {
    pub table_name: String,
    pub filters: Vec<Condition>,
    pub scope: Scope,
    pub limit: Option<usize>,
}

/// UPDATE statement
#[derive(Debug, Clone)]
pub struct UpdateStmt {
    pub table_name: String,
    pub filters: Vec<Condition>,
    pub assignments: Vec<Assignment>,
    pub scope: Scope,
}

/// DELETE statement
///
/// A soft delete is executed as an update of the deletion-marker column, so
/// it carries assignments just like an UPDATE. Hard deletes ignore them.
#[derive(Debug, Clone)]
pub struct DeleteStmt {
    pub table_name: String,
    pub filters: Vec<Condition>,
    pub assignments: Vec<Assignment>,
    pub mode: DeleteMode,
}

impl DeleteStmt {
    pub fn is_soft(&self) -> bool {
        self.mode == DeleteMode::Soft
    }
}

/// Write statements that accept injected filters and assignments.
pub trait ConditionedStatement {
    fn add_filter(&mut self, condition: Condition);
    fn add_assignment(&mut self, assignment: Assignment);
}

impl ConditionedStatement for UpdateStmt {
    fn add_filter(&mut self, condition: Condition) {
        self.filters.push(condition);
    }

    fn add_assignment(&mut self, assignment: Assignment) {
        // A later assignment to the same column replaces the earlier one.
        self.assignments.retain(|a| a.column != assignment.column);
        self.assignments.push(assignment);
    }
}

impl ConditionedStatement for DeleteStmt {
    fn add_filter(&mut self, condition: Condition) {
        self.filters.push(condition);
    }

    fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.retain(|a| a.column != assignment.column);
        self.assignments.push(assignment);
    }
}
