//! Everything needed to define and persist a versioned entity.
//!
//! ```
//! use rowversion::prelude::*;
//!
//! struct Note {
//!     id: Option<i64>,
//!     body: String,
//!     guard: VersionGuard,
//! }
//!
//! impl Versioned for Note {
//!     fn guard(&self) -> &VersionGuard {
//!         &self.guard
//!     }
//!
//!     fn guard_mut(&mut self) -> &mut VersionGuard {
//!         &mut self.guard
//!     }
//! }
//!
//! impl Entity for Note {
//!     fn table_name() -> &'static str {
//!         "notes"
//!     }
//!
//!     fn columns() -> Vec<Column> {
//!         vec![Column::new("body", DataType::Text).not_null()]
//!     }
//!
//!     fn id(&self) -> Option<i64> {
//!         self.id
//!     }
//!
//!     fn set_id(&mut self, id: i64) {
//!         self.id = Some(id);
//!     }
//!
//!     fn values(&self) -> Vec<(&'static str, Value)> {
//!         vec![("body", Value::from(self.body.as_str()))]
//!     }
//!
//!     fn from_record(record: &Record<'_>) -> Result<Self> {
//!         Ok(Self {
//!             id: None,
//!             body: record.get_text("body")?,
//!             guard: VersionGuard::new(),
//!         })
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let session = Session::new(std::sync::Arc::new(Database::new()));
//! session.migrate::<Note>().await?;
//!
//! let mut note = Note { id: None, body: "draft".into(), guard: VersionGuard::new() };
//! session.create(&mut note).await?;
//!
//! let mut stale: Note = session.find(note.id().unwrap_or_default()).await?.unwrap();
//! note.body = "final".into();
//! session.update(&mut note).await?;
//!
//! stale.body = "lost".into();
//! assert!(session.update(&mut stale).await.unwrap_err().is_concurrent_modification());
//! # Ok::<(), DbError>(())
//! # }).unwrap();
//! ```

pub use crate::core::{Column, DataType, DbError, Result, Value};
pub use crate::facade::Database;
pub use crate::guard::{GuardPolicy, SoftDeleteCorrection, VersionGuard, Versioned};
pub use crate::persist::{Entity, GuardConfig, Session};
pub use crate::result::{QueryResult, Record};
pub use crate::storage::StorageOptions;
