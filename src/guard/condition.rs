use crate::core::{Result, Value};
use crate::statement::{Assignment, Condition, ConditionedStatement, UpdateStmt};

/// Version condition produced before a guarded write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionCondition {
    /// Stored version the write requires (`WHERE version = expected`).
    pub expected: u64,
    /// New version to store (`SET version = next`), absent for hard deletes.
    pub next: Option<u64>,
}

impl VersionCondition {
    pub fn is_bumping(&self) -> bool {
        self.next.is_some()
    }

    /// Merges the condition into an outgoing statement.
    ///
    /// Fails without touching `stmt` when a version has no INTEGER form.
    pub fn apply<S: ConditionedStatement>(
        &self,
        version_column: &str,
        stmt: &mut S,
    ) -> Result<()> {
        let expected = Value::try_from(self.expected)?;
        let next = self.next.map(Value::try_from).transpose()?;

        stmt.add_filter(Condition::eq(version_column, expected));
        if let Some(next) = next {
            stmt.add_assignment(Assignment::new(version_column, next));
        }
        Ok(())
    }
}

/// Follow-up write that brings the stored version in line with the bumped
/// in-memory version after a soft delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectiveWrite {
    /// Pre-bump version the row must still carry.
    pub expected: u64,
    pub version: u64,
}

impl CorrectiveWrite {
    /// Unscoped update of one row: soft-deleted rows must still match.
    pub fn to_statement(
        &self,
        table_name: &str,
        id_column: &str,
        id: impl Into<Value>,
        version_column: &str,
    ) -> Result<UpdateStmt> {
        Ok(UpdateStmt::new(table_name)
            .filter(id_column, id)
            .filter(version_column, Value::try_from(self.expected)?)
            .set(version_column, Value::try_from(self.version)?)
            .unscoped())
    }
}
