use crate::guard::{GuardPolicy, SoftDeleteCorrection};

/// Version guard configuration
///
/// Column names are shared by every entity table a session manages.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Source of the read-check value for conditioned writes
    pub policy: GuardPolicy,

    /// When to issue the corrective write after soft deletes
    pub soft_delete_correction: SoftDeleteCorrection,

    /// Primary key column
    pub id_column: String,

    /// Persisted version column
    pub version_column: String,

    /// Deletion-marker column for soft deletes
    pub deleted_at_column: String,
}

impl GuardConfig {
    pub fn new() -> Self {
        Self {
            policy: GuardPolicy::CachedRead,
            soft_delete_correction: SoftDeleteCorrection::Auto,
            id_column: "id".to_string(),
            version_column: "version".to_string(),
            deleted_at_column: "deleted_at".to_string(),
        }
    }

    /// Set the guard policy
    pub fn policy(mut self, policy: GuardPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the soft delete correction mode
    pub fn soft_delete_correction(mut self, mode: SoftDeleteCorrection) -> Self {
        self.soft_delete_correction = mode;
        self
    }

    /// Set the primary key column name
    pub fn id_column(mut self, column: &str) -> Self {
        self.id_column = column.to_string();
        self
    }

    /// Set the version column name
    pub fn version_column(mut self, column: &str) -> Self {
        self.version_column = column.to_string();
        self
    }

    /// Set the deletion-marker column name
    pub fn deleted_at_column(mut self, column: &str) -> Self {
        self.deleted_at_column = column.to_string();
        self
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self::new()
    }
}
