//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling, migration support, and connection
//! configuration for SQLite databases.

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Error, Result};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// In-memory database URL.
pub const MEMORY_URL: &str = ":memory:";

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
struct BusyTimeout;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for BusyTimeout {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a connection pool for the given database URL.
///
/// An in-memory database lives and dies with its connection. For
/// [`MEMORY_URL`] the pool holds exactly one connection and never reaps it.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let builder = Pool::builder().connection_customizer(Box::new(BusyTimeout));
    let builder = if database_url == MEMORY_URL {
        builder.max_size(1).idle_timeout(None).max_lifetime(None)
    } else {
        builder.max_size(5)
    };
    builder
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Run all pending database migrations.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;

    use super::*;

    #[derive(diesel::QueryableByName)]
    struct TableName {
        #[diesel(sql_type = diesel::sql_types::Text)]
        name: String,
    }

    fn tables(pool: &DbPool) -> Vec<String> {
        let mut conn = pool.get().unwrap();
        diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name",
        )
        .load::<TableName>(&mut conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect()
    }

    #[test]
    fn memory_pool_is_single_connection() {
        let pool = create_pool(MEMORY_URL).unwrap();
        assert_eq!(pool.max_size(), 1);
    }

    #[test]
    fn memory_pool_never_reaps_its_connection() {
        let pool = create_pool(MEMORY_URL).unwrap();
        assert_eq!(pool.idle_timeout(), None);
        assert_eq!(pool.max_lifetime(), None);

        run_migrations(&pool).unwrap();
        for _ in 0..5 {
            let conn = pool.get().unwrap();
            drop(conn);
            assert_eq!(tables(&pool), vec!["traders".to_string()]);
        }
    }

    #[test]
    fn file_pool_keeps_default_reaping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.db");
        let pool = create_pool(path.to_str().unwrap()).unwrap();
        assert_eq!(pool.max_size(), 5);
        assert!(pool.idle_timeout().is_some());
    }

    #[test]
    fn run_migrations_creates_traders_table() {
        let pool = create_pool(MEMORY_URL).unwrap();
        run_migrations(&pool).unwrap();
        assert_eq!(tables(&pool), vec!["traders".to_string()]);
    }

    #[test]
    fn run_migrations_is_idempotent() {
        let pool = create_pool(MEMORY_URL).unwrap();
        run_migrations(&pool).unwrap();
        run_migrations(&pool).unwrap();
        assert_eq!(tables(&pool).len(), 1);
    }

    #[test]
    fn file_pool_shares_schema_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.db");
        let pool = create_pool(path.to_str().unwrap()).unwrap();
        run_migrations(&pool).unwrap();

        let first = pool.get().unwrap();
        assert_eq!(tables(&pool), vec!["traders".to_string()]);
        drop(first);
    }
}
