pub mod condition;
pub mod policy;
pub mod version;

pub use condition::{VersionCondition, CorrectiveWrite};
pub use policy::{GuardPolicy, SoftDeleteCorrection};
pub use version::{INITIAL_VERSION, VersionGuard, Versioned};
