pub mod memory;
pub mod table;

pub use memory::{InMemoryStorage, StorageOptions};
pub use table::{Table, TableSchema};
