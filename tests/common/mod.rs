#![allow(dead_code)]

use rowversion::prelude::*;
use std::sync::Arc;

/// Minimal versioned entity used across the integration tests.
#[derive(Debug, Clone)]
pub struct Counter {
    pub id: Option<i64>,
    pub value: i64,
    pub guard: VersionGuard,
}

impl Counter {
    pub fn new(value: i64) -> Self {
        Self {
            id: None,
            value,
            guard: VersionGuard::new(),
        }
    }

    pub fn pk(&self) -> i64 {
        self.id.expect("counter was not created")
    }
}

impl Versioned for Counter {
    fn guard(&self) -> &VersionGuard {
        &self.guard
    }

    fn guard_mut(&mut self) -> &mut VersionGuard {
        &mut self.guard
    }
}

impl Entity for Counter {
    fn table_name() -> &'static str {
        "counters"
    }

    fn columns() -> Vec<Column> {
        vec![Column::new("value", DataType::Integer).not_null()]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![("value", Value::from(self.value))]
    }

    fn from_record(record: &Record<'_>) -> Result<Self> {
        Ok(Self {
            id: None,
            value: record.get_i64("value")?,
            guard: VersionGuard::new(),
        })
    }
}

/// Entity without a deletion marker: every delete is physical.
#[derive(Debug, Clone)]
pub struct Ledger {
    pub id: Option<i64>,
    pub label: String,
    pub guard: VersionGuard,
}

impl Ledger {
    pub fn new(label: &str) -> Self {
        Self {
            id: None,
            label: label.to_string(),
            guard: VersionGuard::new(),
        }
    }
}

impl Versioned for Ledger {
    fn guard(&self) -> &VersionGuard {
        &self.guard
    }

    fn guard_mut(&mut self) -> &mut VersionGuard {
        &mut self.guard
    }
}

impl Entity for Ledger {
    fn table_name() -> &'static str {
        "ledgers"
    }

    fn columns() -> Vec<Column> {
        vec![Column::new("label", DataType::Text).not_null()]
    }

    fn soft_delete() -> bool {
        false
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![("label", Value::from(self.label.as_str()))]
    }

    fn from_record(record: &Record<'_>) -> Result<Self> {
        Ok(Self {
            id: None,
            label: record.get_text("label")?,
            guard: VersionGuard::new(),
        })
    }
}

pub async fn session() -> Session {
    session_with(StorageOptions::default(), GuardConfig::default()).await
}

pub async fn session_with(options: StorageOptions, config: GuardConfig) -> Session {
    let db = Arc::new(Database::with_options(options));
    let session = Session::with_config(db, config);
    session.migrate::<Counter>().await.unwrap();
    session.migrate::<Ledger>().await.unwrap();
    session
}

/// Stored version of a counter, read past the soft-delete scope.
pub async fn stored_version(session: &Session, id: i64) -> Option<u64> {
    session
        .find_unscoped::<Counter>(id)
        .await
        .unwrap()
        .map(|c| c.version())
}

/// Creates a counter and returns two independently loaded copies of it.
pub async fn two_copies(session: &Session, value: i64) -> (Counter, Counter) {
    let mut counter = Counter::new(value);
    session.create(&mut counter).await.unwrap();
    let a = session.find::<Counter>(counter.pk()).await.unwrap().unwrap();
    let b = session.find::<Counter>(counter.pk()).await.unwrap().unwrap();
    (a, b)
}
