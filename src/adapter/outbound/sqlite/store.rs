//! SQLite desired-state store.
//!
//! Persists trader records with Diesel. Upserts keep the original
//! `created_at` and refresh `updated_at`.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::SqliteConnection;

use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations, DbPool};
use crate::adapter::outbound::sqlite::database::model::TraderRow;
use crate::adapter::outbound::sqlite::database::schema::traders;
use crate::domain::{TraderId, TraderRecord};
use crate::error::{Error, Result};
use crate::port::outbound::store::DesiredStateSource;

/// SQLite-backed desired-state store.
pub struct SqliteTraderStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteTraderStore {
    /// Create a store over an already migrated pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open (or create) the database at `database_url` and run migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created or migrations fail.
    pub fn open(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url)?;
        run_migrations(&pool)?;
        Ok(Self::new(pool))
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count(&self) -> Result<i64> {
        let mut conn = self.conn()?;
        traders::table
            .count()
            .get_result(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// When a record was first stored and last updated (RFC 3339).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn timestamps(&self, id: &TraderId) -> Result<Option<(String, String)>> {
        let mut conn = self.conn()?;
        traders::table
            .find(id.as_str())
            .select((traders::created_at, traders::updated_at))
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>> {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }
}

#[async_trait]
impl DesiredStateSource for SqliteTraderStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn list_desired(&self) -> Result<Vec<TraderRecord>> {
        let mut conn = self.conn()?;
        let rows: Vec<TraderRow> = traders::table
            .order(traders::trader_id.asc())
            .select(TraderRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(TraderRow::into_record).collect()
    }

    async fn upsert(&self, record: &TraderRecord) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let row = TraderRow::from_record(record, &now)?;
        let mut conn = self.conn()?;

        diesel::insert_into(traders::table)
            .values(&row)
            .on_conflict(traders::trader_id)
            .do_update()
            .set(&row.changeset())
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: &TraderId) -> Result<bool> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(traders::table.find(id.as_str()))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(deleted > 0)
    }
}
