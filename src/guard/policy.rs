use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the guard takes the value a write is conditioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GuardPolicy {
    /// Condition on the transient read version captured at create/load and
    /// after each successful write. Direct edits of the version field
    /// between load and write do not affect the check.
    #[default]
    CachedRead,
    /// Condition on the in-memory version field itself, bumping it in place.
    /// A caller that edits the field between load and write changes the check.
    Inline,
}

impl fmt::Display for GuardPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CachedRead => "cached_read",
            Self::Inline => "inline",
        };
        write!(f, "{label}")
    }
}

/// When to issue the corrective version write after a soft delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SoftDeleteCorrection {
    /// Only on stores whose soft delete is known to drop extra assignments.
    #[default]
    Auto,
    Always,
    Never,
}

impl SoftDeleteCorrection {
    pub fn applies(self, store_drops_assignments: bool) -> bool {
        match self {
            Self::Auto => store_drops_assignments,
            Self::Always => true,
            Self::Never => false,
        }
    }
}
