use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager};

use super::DatabaseError;

pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

async fn with_connection<T, F>(pool: PgPool, operation: F) -> Result<T, DatabaseError>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> Result<T, DatabaseError> + Send + 'static,
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

pub struct PostgresItemStore {
    pool: PgPool,
}

impl PostgresItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

super::stores::impl_item_store!(PostgresItemStore);
