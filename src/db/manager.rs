use std::sync::Arc;

use diesel::RunQueryDsl;
use tracing::info;

use crate::config::{DatabaseConfig, DbType};
use crate::db::{DatabaseError, ItemStore};

#[cfg(feature = "postgres")]
use crate::db::postgres::{PgPool, PostgresItemStore};
#[cfg(feature = "postgres")]
use diesel::pg::PgConnection;

#[cfg(feature = "sqlite")]
use crate::db::sqlite::{SqliteItemStore, SqlitePool};
#[cfg(feature = "sqlite")]
use diesel::sqlite::SqliteConnection;

#[cfg(any(feature = "postgres", feature = "sqlite"))]
use diesel::r2d2::{self, ConnectionManager};

#[cfg(feature = "postgres")]
const POSTGRES_MIGRATIONS: &[&str] = &[r#"
    CREATE TABLE IF NOT EXISTS items (
        id SERIAL PRIMARY KEY,
        title VARCHAR(100) NOT NULL,
        description TEXT,
        completed BOOLEAN NOT NULL DEFAULT FALSE
    )
    "#];

#[cfg(feature = "sqlite")]
const SQLITE_MIGRATIONS: &[&str] = &[r#"
    CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title VARCHAR(100) NOT NULL,
        description TEXT,
        completed BOOLEAN NOT NULL DEFAULT 0
    )
    "#];

#[derive(Clone)]
pub struct DatabaseManager {
    #[cfg(feature = "postgres")]
    postgres_pool: Option<PgPool>,
    #[cfg(feature = "sqlite")]
    sqlite_pool: Option<SqlitePool>,
    item_store: Arc<dyn ItemStore>,
    db_type: DbType,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let db_type = config.db_type().ok_or_else(|| {
            DatabaseError::Connection(format!(
                "unsupported database url: {}",
                config.connection_string()
            ))
        })?;

        match db_type {
            #[cfg(feature = "postgres")]
            DbType::Postgres => {
                let manager = ConnectionManager::<PgConnection>::new(config.connection_string());

                let pool = r2d2::Pool::builder()
                    .max_size(config.max_connections())
                    .min_idle(Some(config.min_connections()))
                    .build(manager)
                    .map_err(|e| DatabaseError::Connection(e.to_string()))?;

                info!(
                    max_connections = config.max_connections(),
                    "connected to postgres"
                );

                Ok(Self {
                    item_store: Arc::new(PostgresItemStore::new(pool.clone())),
                    postgres_pool: Some(pool),
                    #[cfg(feature = "sqlite")]
                    sqlite_pool: None,
                    db_type,
                })
            }
            #[cfg(feature = "sqlite")]
            DbType::Sqlite => {
                let path = config.sqlite_path().ok_or_else(|| {
                    DatabaseError::Connection("sqlite database path is missing".to_string())
                })?;
                let manager = ConnectionManager::<SqliteConnection>::new(path.as_str());

                // A single long-lived connection keeps `:memory:` databases alive
                // and serializes writers.
                let pool = r2d2::Pool::builder()
                    .max_size(config.max_connections())
                    .min_idle(Some(config.min_connections()))
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .build(manager)
                    .map_err(|e| DatabaseError::Connection(e.to_string()))?;

                info!(path = %path, "opened sqlite database");

                Ok(Self {
                    item_store: Arc::new(SqliteItemStore::new(pool.clone())),
                    #[cfg(feature = "postgres")]
                    postgres_pool: None,
                    sqlite_pool: Some(pool),
                    db_type,
                })
            }
            #[cfg(not(feature = "postgres"))]
            DbType::Postgres => Err(DatabaseError::Connection(
                "PostgreSQL feature not enabled".to_string(),
            )),
            #[cfg(not(feature = "sqlite"))]
            DbType::Sqlite => Err(DatabaseError::Connection(
                "SQLite feature not enabled".to_string(),
            )),
        }
    }

    /// Creates the `items` table when it does not exist yet.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        match self.db_type {
            #[cfg(feature = "postgres")]
            DbType::Postgres => {
                let pool = self.postgres_pool.clone().ok_or_else(|| {
                    DatabaseError::Migration("postgres pool is not initialized".to_string())
                })?;
                Self::migrate_postgres(pool).await?;
            }
            #[cfg(feature = "sqlite")]
            DbType::Sqlite => {
                let pool = self.sqlite_pool.clone().ok_or_else(|| {
                    DatabaseError::Migration("sqlite pool is not initialized".to_string())
                })?;
                Self::migrate_sqlite(pool).await?;
            }
            #[cfg(not(feature = "postgres"))]
            DbType::Postgres => {
                return Err(DatabaseError::Migration(
                    "PostgreSQL feature not enabled".to_string(),
                ));
            }
            #[cfg(not(feature = "sqlite"))]
            DbType::Sqlite => {
                return Err(DatabaseError::Migration(
                    "SQLite feature not enabled".to_string(),
                ));
            }
        }

        info!(backend = ?self.db_type, "database schema is up to date");
        Ok(())
    }

    #[cfg(feature = "postgres")]
    async fn migrate_postgres(pool: PgPool) -> Result<(), DatabaseError> {
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| DatabaseError::Connection(e.to_string()))?;

            for statement in POSTGRES_MIGRATIONS {
                diesel::sql_query(*statement)
                    .execute(&mut conn)
                    .map_err(|e| DatabaseError::Migration(e.to_string()))?;
            }

            Ok(())
        })
        .await
        .map_err(|e| DatabaseError::Migration(format!("migration task failed: {e}")))?
    }

    #[cfg(feature = "sqlite")]
    async fn migrate_sqlite(pool: SqlitePool) -> Result<(), DatabaseError> {
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| DatabaseError::Connection(e.to_string()))?;

            for statement in SQLITE_MIGRATIONS {
                diesel::sql_query(*statement)
                    .execute(&mut conn)
                    .map_err(|e| DatabaseError::Migration(e.to_string()))?;
            }

            Ok(())
        })
        .await
        .map_err(|e| DatabaseError::Migration(format!("migration task failed: {e}")))?
    }

    pub fn item_store(&self) -> Arc<dyn ItemStore> {
        self.item_store.clone()
    }

    pub fn db_type(&self) -> DbType {
        self.db_type
    }
}
