use diesel::r2d2::{self, ConnectionManager};
use diesel::sqlite::SqliteConnection;

use super::DatabaseError;

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

async fn with_connection<T, F>(pool: SqlitePool, operation: F) -> Result<T, DatabaseError>
where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> Result<T, DatabaseError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut conn = pool
            .get()
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        operation(&mut conn)
    })
    .await
    .map_err(|e| DatabaseError::Query(format!("database task failed: {e}")))?
}

pub struct SqliteItemStore {
    pool: SqlitePool,
}

impl SqliteItemStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

super::stores::impl_item_store!(SqliteItemStore);
