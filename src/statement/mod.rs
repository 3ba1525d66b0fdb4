pub mod ast;
mod builder;

pub use ast::{
    Assignment, Condition, ConditionedStatement, CreateTableStmt, DeleteMode, DeleteStmt,
    InsertStmt, QueryStmt, Scope, Statement, UpdateStmt,
};
