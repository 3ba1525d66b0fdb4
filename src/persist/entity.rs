use crate::core::{Column, Result, Value};
use crate::guard::Versioned;
use crate::result::Record;

/// Row-backed entity managed by a [`Session`](super::Session).
///
/// The session owns the bookkeeping columns (id, version, deletion marker);
/// implementors describe only their domain columns.
pub trait Entity: Versioned + Sized + Send + Sync {
    /// Backing table name.
    fn table_name() -> &'static str;

    /// Domain columns, without id, version or deletion marker.
    fn columns() -> Vec<Column>;

    /// Whether deletes default to soft deletes. Adds the marker column.
    fn soft_delete() -> bool {
        true
    }

    /// Primary key, `None` until the entity has been created.
    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    /// Current domain column values.
    fn values(&self) -> Vec<(&'static str, Value)>;

    /// Builds the entity from a stored row. The session restores the id and
    /// the version guard afterwards.
    fn from_record(record: &Record<'_>) -> Result<Self>;
}
