// ============================================================================
// Version Guard
// ============================================================================
//
// Optimistic row-version bookkeeping embedded in every persisted entity.
//
// The persistence layer calls into the guard at fixed points of its own
// pipeline:
//
//   create ........ reset_for_create() / on_created()
//   load .......... on_loaded()
//   before write .. prepare_conditioned_write()
//   after write ... after_write() / confirm_write_applied()
//   after soft del  soft_delete_correction()
//
// Versions are u64 in memory but INTEGER in storage; a version above
// i64::MAX is rejected when the condition is built, never truncated.
//
// The guard holds no locks. Detecting a lost update relies on the store
// evaluating `WHERE version = expected` and the write in one atomic step.
//
// ============================================================================

use super::{VersionCondition, CorrectiveWrite, GuardPolicy, SoftDeleteCorrection};
use crate::core::{DbError, Result};
use crate::result::QueryResult;
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

/// Version assigned to a freshly created row.
pub const INITIAL_VERSION: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionGuard {
    version: u64,
    /// Version last confirmed in storage for this copy. Never persisted.
    #[serde(skip)]
    read_version: u64,
}

impl VersionGuard {
    pub fn new() -> Self {
        Self {
            version: INITIAL_VERSION,
            read_version: 0,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn read_version(&self) -> u64 {
        self.read_version
    }

    /// Overwrites the in-memory version without touching the read version.
    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Value the next write will be conditioned on.
    pub fn read_check_value(&self, policy: GuardPolicy) -> u64 {
        match policy {
            GuardPolicy::CachedRead => self.read_version,
            GuardPolicy::Inline => self.version,
        }
    }

    /// Builds the version condition for an update or delete.
    ///
    /// With `bump` the in-memory version moves to `expected + 1` right away,
    /// before the store has accepted anything. If the write then fails, the
    /// field stays ahead of storage until the entity is loaded again.
    pub fn prepare_conditioned_write(&mut self, policy: GuardPolicy, bump: bool) -> VersionCondition {
        let expected = self.read_check_value(policy);
        let next = if bump {
            let next = expected.saturating_add(1);
            self.version = next;
            Some(next)
        } else {
            None
        };

        VersionCondition { expected, next }
    }

    /// Interprets the affected-row count of a conditioned write.
    pub fn confirm_write_applied(&mut self, cond: &VersionCondition, affected_rows: usize) -> Result<()> {
        if affected_rows == 0 {
            event!(
                Level::DEBUG,
                expected_version = cond.expected,
                "conditioned write matched no row"
            );
            return Err(DbError::ConcurrentModification {
                expected_version: cond.expected,
            });
        }

        self.read_version = self.version;
        Ok(())
    }

    /// Runs the post-write check on an executor outcome.
    ///
    /// A lower-level error is returned untouched and no version check is made.
    pub fn after_write(
        &mut self,
        cond: &VersionCondition,
        outcome: Result<QueryResult>,
    ) -> Result<QueryResult> {
        let result = outcome?;
        self.confirm_write_applied(cond, result.affected_rows())?;
        Ok(result)
    }

    /// Corrective write owed after a successful soft delete, if any.
    ///
    /// Only the cached-read policy corrects, and only when `mode` says the
    /// store needs it. The caller must not check the outcome for conflicts.
    pub fn soft_delete_correction(
        &self,
        cond: &VersionCondition,
        policy: GuardPolicy,
        mode: SoftDeleteCorrection,
        store_drops_assignments: bool,
    ) -> Option<CorrectiveWrite> {
        if policy != GuardPolicy::CachedRead || !mode.applies(store_drops_assignments) {
            return None;
        }
        cond.next?;

        Some(CorrectiveWrite {
            expected: cond.expected,
            version: self.version,
        })
    }

    /// Call before inserting a new row: whatever this copy carried from an
    /// earlier life, the row starts at [`INITIAL_VERSION`].
    pub fn reset_for_create(&mut self) {
        self.version = INITIAL_VERSION;
        self.read_version = 0;
    }

    /// Call after the row was inserted successfully.
    pub fn on_created(&mut self) {
        self.read_version = self.version;
    }

    /// Call after the row was read from storage successfully.
    pub fn on_loaded(&mut self) {
        self.read_version = self.version;
    }
}

impl Default for VersionGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability of entities carrying a [`VersionGuard`].
pub trait Versioned {
    fn guard(&self) -> &VersionGuard;
    fn guard_mut(&mut self) -> &mut VersionGuard;

    fn version(&self) -> u64 {
        self.guard().version()
    }
}

impl Versioned for VersionGuard {
    fn guard(&self) -> &VersionGuard {
        self
    }

    fn guard_mut(&mut self) -> &mut VersionGuard {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created() -> VersionGuard {
        let mut guard = VersionGuard::new();
        guard.on_created();
        guard
    }

    #[test]
    fn test_new_guard_starts_at_one() {
        let guard = created();
        assert_eq!(guard.version(), 1);
        assert_eq!(guard.read_version(), 1);
    }

    #[test]
    fn test_reset_for_create_discards_history() {
        let mut guard = created();
        let cond = guard.prepare_conditioned_write(GuardPolicy::CachedRead, true);
        guard.confirm_write_applied(&cond, 1).unwrap();
        assert_eq!(guard.version(), 2);

        guard.reset_for_create();
        assert_eq!(guard.version(), INITIAL_VERSION);
        assert_eq!(guard.read_version(), 0);
    }

    #[test]
    fn test_prepare_bumps_in_memory_version() {
        let mut guard = created();
        let cond = guard.prepare_conditioned_write(GuardPolicy::CachedRead, true);

        assert_eq!(cond, VersionCondition { expected: 1, next: Some(2) });
        assert_eq!(guard.version(), 2);
        assert_eq!(guard.read_version(), 1);
    }

    #[test]
    fn test_prepare_without_bump_leaves_version() {
        let mut guard = created();
        let cond = guard.prepare_conditioned_write(GuardPolicy::CachedRead, false);

        assert_eq!(cond, VersionCondition { expected: 1, next: None });
        assert_eq!(guard.version(), 1);
    }

    #[test]
    fn test_confirm_refreshes_read_version() {
        let mut guard = created();
        let cond = guard.prepare_conditioned_write(GuardPolicy::CachedRead, true);
        guard.confirm_write_applied(&cond, 1).unwrap();
        assert_eq!(guard.read_version(), 2);

        let cond = guard.prepare_conditioned_write(GuardPolicy::CachedRead, true);
        assert_eq!(cond.expected, 2);
        assert_eq!(cond.next, Some(3));
    }

    #[test]
    fn test_zero_rows_is_conflict() {
        let mut guard = created();
        let cond = guard.prepare_conditioned_write(GuardPolicy::CachedRead, true);
        let err = guard.confirm_write_applied(&cond, 0).unwrap_err();

        assert_eq!(err, DbError::ConcurrentModification { expected_version: 1 });
        // optimistic bump is not rolled back
        assert_eq!(guard.version(), 2);
        assert_eq!(guard.read_version(), 1);
    }

    #[test]
    fn test_lower_level_error_passes_through() {
        let mut guard = created();
        let cond = guard.prepare_conditioned_write(GuardPolicy::CachedRead, true);
        let outcome = Err(DbError::TableNotFound("items".into()));

        let err = guard.after_write(&cond, outcome).unwrap_err();
        assert_eq!(err, DbError::TableNotFound("items".into()));
        assert_eq!(guard.read_version(), 1);
    }

    #[test]
    fn test_after_write_checks_affected_rows() {
        let mut guard = created();
        let cond = guard.prepare_conditioned_write(GuardPolicy::CachedRead, true);
        let err = guard
            .after_write(&cond, Ok(QueryResult::updated(0)))
            .unwrap_err();
        assert!(err.is_concurrent_modification());

        let mut guard = created();
        let cond = guard.prepare_conditioned_write(GuardPolicy::CachedRead, true);
        let result = guard.after_write(&cond, Ok(QueryResult::updated(1))).unwrap();
        assert_eq!(result.affected_rows(), 1);
    }

    #[test]
    fn test_cached_read_ignores_direct_version_edits() {
        let mut guard = created();
        guard.set_version(40);

        let cond = guard.prepare_conditioned_write(GuardPolicy::CachedRead, true);
        assert_eq!(cond, VersionCondition { expected: 1, next: Some(2) });
    }

    #[test]
    fn test_inline_uses_version_field() {
        let mut guard = created();
        guard.set_version(40);

        let cond = guard.prepare_conditioned_write(GuardPolicy::Inline, true);
        assert_eq!(cond, VersionCondition { expected: 40, next: Some(41) });
        assert_eq!(guard.version(), 41);
    }

    #[test]
    fn test_correction_only_for_cached_read_soft_delete() {
        let mut guard = created();
        let cond = guard.prepare_conditioned_write(GuardPolicy::CachedRead, true);
        guard.confirm_write_applied(&cond, 1).unwrap();

        assert_eq!(
            guard.soft_delete_correction(&cond, GuardPolicy::CachedRead, SoftDeleteCorrection::Auto, true),
            Some(CorrectiveWrite { expected: 1, version: 2 })
        );
        assert_eq!(
            guard.soft_delete_correction(&cond, GuardPolicy::CachedRead, SoftDeleteCorrection::Auto, false),
            None
        );
        assert_eq!(
            guard.soft_delete_correction(&cond, GuardPolicy::Inline, SoftDeleteCorrection::Always, true),
            None
        );

        let hard = VersionCondition { expected: 2, next: None };
        assert_eq!(
            guard.soft_delete_correction(&hard, GuardPolicy::CachedRead, SoftDeleteCorrection::Always, true),
            None
        );
    }

    #[test]
    fn test_read_version_is_not_serialized() {
        let mut guard = created();
        let cond = guard.prepare_conditioned_write(GuardPolicy::CachedRead, true);
        guard.confirm_write_applied(&cond, 1).unwrap();

        let json = serde_json::to_string(&guard).unwrap();
        assert_eq!(json, r#"{"version":2}"#);

        let restored: VersionGuard = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.version(), 2);
        assert_eq!(restored.read_version(), 0);
    }
}
