// ============================================================================
// rowversion Library
// ============================================================================
//
// Optimistic row-version concurrency control on top of a small in-memory
// relational store.
//
//   core / statement / storage / executor / facade   the store
//   guard                                            version bookkeeping
//   persist                                          entities and sessions
//
// ============================================================================

pub mod core;
pub mod executor;
pub mod facade;
pub mod guard;
pub mod persist;
pub mod prelude;
pub mod result;
pub mod statement;
pub mod storage;

// Re-export main types for convenience
pub use core::{Column, DataType, DbError, Result, Value};
pub use facade::Database;
pub use guard::{GuardPolicy, SoftDeleteCorrection, VersionGuard, Versioned};
pub use persist::{Entity, GuardConfig, Session};
pub use result::{QueryResult, Record};
pub use storage::StorageOptions;
