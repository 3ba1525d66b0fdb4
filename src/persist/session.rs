use super::{Entity, GuardConfig};
use crate::core::{Column, DataType, DbError, Result, Value};
use crate::facade::Database;
use crate::guard::{VersionCondition, INITIAL_VERSION};
use crate::result::{QueryResult, Record};
use crate::statement::{
    ConditionedStatement, CreateTableStmt, DeleteMode, DeleteStmt, InsertStmt, QueryStmt, Scope,
    Statement, UpdateStmt,
};
use std::sync::Arc;
use tracing::{Instrument, Level, event, info_span};

/// Persistence layer for [`Entity`] types.
///
/// Every update and delete goes through the entity's version guard: the
/// statement is conditioned on the version this copy last saw, and a write
/// that matches no row fails with [`DbError::ConcurrentModification`].
/// Sessions are cheap to clone and share one [`Database`].
#[derive(Clone)]
pub struct Session {
    db: Arc<Database>,
    config: GuardConfig,
}

impl Session {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_config(db, GuardConfig::default())
    }

    pub fn with_config(db: Arc<Database>, config: GuardConfig) -> Self {
        Self { db, config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Creates the entity's table if it does not exist yet.
    pub async fn migrate<E: Entity>(&self) -> Result<()> {
        let mut create = CreateTableStmt::new(E::table_name(), self.config.id_column.as_str())
            .column(Column::new(self.config.id_column.as_str(), DataType::Integer).not_null());

        for column in E::columns() {
            create = create.column(column);
        }

        create = create.column(
            Column::new(self.config.version_column.as_str(), DataType::Integer)
                .not_null()
                .default_value(Value::try_from(INITIAL_VERSION)?),
        );

        if E::soft_delete() {
            create = create
                .column(Column::new(
                    self.config.deleted_at_column.as_str(),
                    DataType::Timestamp,
                ))
                .soft_delete_column(self.config.deleted_at_column.as_str());
        }

        self.db
            .execute(&Statement::CreateTable(create.if_not_exists()))
            .await?;
        Ok(())
    }

    /// Inserts the entity as a new row at the initial version and records it
    /// as confirmed.
    pub async fn create<E: Entity>(&self, entity: &mut E) -> Result<()> {
        let span = info_span!("session.create", table = E::table_name());

        async {
            let mut insert = InsertStmt::new(E::table_name());
            if let Some(id) = entity.id() {
                insert = insert.value(self.config.id_column.as_str(), id);
            }
            for (column, value) in entity.values() {
                insert = insert.value(column, value);
            }
            entity.guard_mut().reset_for_create();
            insert = insert.value(
                self.config.version_column.as_str(),
                Value::try_from(entity.version())?,
            );

            let result = self.db.execute(&Statement::Insert(insert)).await?;
            let record = result.first().ok_or_else(|| {
                DbError::ExecutionError(format!(
                    "Insert into '{}' returned no row",
                    E::table_name()
                ))
            })?;

            entity.set_id(record.get_i64(&self.config.id_column)?);
            entity
                .guard_mut()
                .set_version(record.get_u64(&self.config.version_column)?);
            entity.guard_mut().on_created();

            event!(Level::DEBUG, id = ?entity.id(), version = entity.version(), "entity created");
            Ok::<_, DbError>(())
        }
        .instrument(span)
        .await
    }

    /// Loads a live (not soft-deleted) entity by id.
    pub async fn find<E: Entity>(&self, id: i64) -> Result<Option<E>> {
        self.find_scoped(id, Scope::Default).await
    }

    /// Loads an entity by id, including soft-deleted rows.
    pub async fn find_unscoped<E: Entity>(&self, id: i64) -> Result<Option<E>> {
        self.find_scoped(id, Scope::Unscoped).await
    }

    /// Replaces the in-memory copy with what storage holds now.
    ///
    /// Returns `false` when the row no longer exists at all.
    pub async fn reload<E: Entity>(&self, entity: &mut E) -> Result<bool> {
        let Some(id) = entity.id() else {
            return Ok(false);
        };
        match self.find_unscoped::<E>(id).await? {
            Some(fresh) => {
                *entity = fresh;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Writes all domain columns, conditioned on the version this copy last
    /// saw, and advances the version by one.
    pub async fn update<E: Entity>(&self, entity: &mut E) -> Result<()> {
        let span = info_span!("session.update", table = E::table_name(), id = ?entity.id());

        async {
            let mut update = UpdateStmt::new(E::table_name())
                .filter(self.config.id_column.as_str(), entity.id());
            for (column, value) in entity.values() {
                update = update.set(column, value);
            }

            let cond = self.prepare(entity, true, &mut update)?;
            let outcome = self.db.execute(&Statement::Update(update)).await;
            self.confirm(entity, &cond, outcome)?;

            event!(Level::DEBUG, version = entity.version(), "entity updated");
            Ok::<_, DbError>(())
        }
        .instrument(span)
        .await
    }

    /// Soft deletes when the entity type supports it, hard deletes otherwise.
    pub async fn delete<E: Entity>(&self, entity: &mut E) -> Result<()> {
        let mode = if E::soft_delete() {
            DeleteMode::Soft
        } else {
            DeleteMode::Hard
        };
        self.delete_with_mode(entity, mode).await
    }

    /// Physically removes the row. The version is checked but not bumped.
    pub async fn delete_unscoped<E: Entity>(&self, entity: &mut E) -> Result<()> {
        self.delete_with_mode(entity, DeleteMode::Hard).await
    }

    async fn delete_with_mode<E: Entity>(&self, entity: &mut E, mode: DeleteMode) -> Result<()> {
        let soft = mode == DeleteMode::Soft;
        let span = info_span!("session.delete", table = E::table_name(), id = ?entity.id(), soft);

        async {
            let mut delete = match mode {
                DeleteMode::Soft => DeleteStmt::soft(E::table_name()),
                DeleteMode::Hard => DeleteStmt::hard(E::table_name()),
            }
            .filter(self.config.id_column.as_str(), entity.id());

            // A soft delete is a row update and advances the version.
            let is_soft = delete.is_soft();
            let cond = self.prepare(entity, is_soft, &mut delete)?;
            let outcome = self.db.execute(&Statement::Delete(delete)).await;
            self.confirm(entity, &cond, outcome)?;

            if is_soft {
                self.correct_soft_delete(entity, &cond).await?;
            }

            event!(Level::DEBUG, version = entity.version(), "entity deleted");
            Ok::<_, DbError>(())
        }
        .instrument(span)
        .await
    }

    async fn correct_soft_delete<E: Entity>(&self, entity: &E, cond: &VersionCondition) -> Result<()> {
        let Some(fix) = entity.guard().soft_delete_correction(
            cond,
            self.config.policy,
            self.config.soft_delete_correction,
            self.db.soft_delete_drops_assignments(),
        ) else {
            return Ok(());
        };

        let stmt = fix.to_statement(
            E::table_name(),
            &self.config.id_column,
            entity.id(),
            &self.config.version_column,
        )?;

        // Best effort: a miss here is not a conflict, the primary write
        // already passed its version check.
        let result = self.db.execute(&Statement::Update(stmt)).await?;
        if result.affected_rows() == 0 {
            event!(
                Level::DEBUG,
                expected_version = fix.expected,
                "soft delete correction matched no row"
            );
        } else {
            event!(Level::DEBUG, version = fix.version, "soft delete version corrected");
        }
        Ok(())
    }

    fn prepare<E: Entity, S: ConditionedStatement>(
        &self,
        entity: &mut E,
        bump: bool,
        stmt: &mut S,
    ) -> Result<VersionCondition> {
        let cond = entity
            .guard_mut()
            .prepare_conditioned_write(self.config.policy, bump);
        cond.apply(&self.config.version_column, stmt)?;
        Ok(cond)
    }

    fn confirm<E: Entity>(
        &self,
        entity: &mut E,
        cond: &VersionCondition,
        outcome: Result<QueryResult>,
    ) -> Result<()> {
        match entity.guard_mut().after_write(cond, outcome) {
            Ok(_) => Ok(()),
            Err(err) => {
                if err.is_concurrent_modification() {
                    event!(
                        Level::WARN,
                        table = E::table_name(),
                        id = ?entity.id(),
                        expected_version = cond.expected,
                        "concurrent modification detected"
                    );
                }
                Err(err)
            }
        }
    }

    async fn find_scoped<E: Entity>(&self, id: i64, scope: Scope) -> Result<Option<E>> {
        let mut query = QueryStmt::new(E::table_name())
            .filter(self.config.id_column.as_str(), id)
            .limit(1);
        query.scope = scope;

        let result = self.db.execute(&Statement::Query(query)).await?;
        result
            .first()
            .map(|record| self.hydrate(&record))
            .transpose()
    }

    fn hydrate<E: Entity>(&self, record: &Record<'_>) -> Result<E> {
        let mut entity = E::from_record(record)?;
        entity.set_id(record.get_i64(&self.config.id_column)?);
        entity
            .guard_mut()
            .set_version(record.get_u64(&self.config.version_column)?);
        entity.guard_mut().on_loaded();
        Ok(entity)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
