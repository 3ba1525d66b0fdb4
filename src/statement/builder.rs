// ============================================================================
// Statement builders
// ============================================================================
//
// Chainable constructors so callers can write
// `UpdateStmt::new("items").filter("id", 1).set("value", 10)`.
//
// ============================================================================

use super::ast::{
    Assignment, Condition, CreateTableStmt, DeleteMode, DeleteStmt, InsertStmt, QueryStmt, Scope,
    UpdateStmt,
};
use crate::core::{Column, Value};

impl CreateTableStmt {
    pub fn new(table_name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
            primary_key: primary_key.into(),
            soft_delete_column: None,
            if_not_exists: false,
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn soft_delete_column(mut self, column: impl Into<String>) -> Self {
        self.soft_delete_column = Some(column.into());
        self
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }
}

impl InsertStmt {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            values: Vec::new(),
        }
    }

    pub fn value(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.push(Assignment::new(column, value));
        self
    }
}

impl QueryStmt {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            filters: Vec::new(),
            scope: Scope::Default,
            limit: None,
        }
    }

    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Condition::eq(column, value));
        self
    }

    pub fn unscoped(mut self) -> Self {
        self.scope = Scope::Unscoped;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl UpdateStmt {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            filters: Vec::new(),
            assignments: Vec::new(),
            scope: Scope::Default,
        }
    }

    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Condition::eq(column, value));
        self
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assignments.push(Assignment::new(column, value));
        self
    }

    pub fn unscoped(mut self) -> Self {
        self.scope = Scope::Unscoped;
        self
    }
}

impl DeleteStmt {
    pub fn soft(table_name: impl Into<String>) -> Self {
        Self::with_mode(table_name, DeleteMode::Soft)
    }

    pub fn hard(table_name: impl Into<String>) -> Self {
        Self::with_mode(table_name, DeleteMode::Hard)
    }

    fn with_mode(table_name: impl Into<String>, mode: DeleteMode) -> Self {
        Self {
            table_name: table_name.into(),
            filters: Vec::new(),
            assignments: Vec::new(),
            mode,
        }
    }

    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Condition::eq(column, value));
        self
    }
}
