use async_trait::async_trait;

use super::DatabaseError;
use super::models::{Item, ItemChanges, NewItem};

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All items, ordered by id.
    async fn list_items(&self) -> Result<Vec<Item>, DatabaseError>;
    async fn get_item(&self, id: i64) -> Result<Option<Item>, DatabaseError>;
    async fn count_items(&self) -> Result<i64, DatabaseError>;
    /// Inserts the item and returns the stored row with its assigned id.
    async fn create_item(&self, item: &NewItem) -> Result<Item, DatabaseError>;
    /// Returns `None` when no row has this id.
    async fn update_item(
        &self,
        id: i64,
        changes: &ItemChanges,
    ) -> Result<Option<Item>, DatabaseError>;
    /// Returns `false` when no row has this id.
    async fn delete_item(&self, id: i64) -> Result<bool, DatabaseError>;
}

/// Implements [`ItemStore`] for a backend store type.
///
/// The invoking module must define `with_connection(pool, operation)` for its
/// diesel connection type, and the store must hold that pool in `self.pool`.
macro_rules! impl_item_store {
    ($store:ty) => {
        #[async_trait::async_trait]
        impl $crate::db::ItemStore for $store {
            async fn list_items(
                &self,
            ) -> Result<Vec<$crate::db::Item>, $crate::db::DatabaseError> {
                let pool = self.pool.clone();
                with_connection(pool, move |conn| {
                    use $crate::db::records::DbItem;
                    use $crate::db::schema::items::dsl::*;
                    use diesel::prelude::*;
                    let results = items
                        .order(id.asc())
                        .select(DbItem::as_select())
                        .load::<DbItem>(conn)
                        .map_err(|e| $crate::db::DatabaseError::Query(e.to_string()))?;

                    Ok(results.into_iter().map(Into::into).collect())
                })
                .await
            }

            async fn get_item(
                &self,
                item_id: i64,
            ) -> Result<Option<$crate::db::Item>, $crate::db::DatabaseError> {
                let Some(item_id) = $crate::db::records::storage_id(item_id) else {
                    return Ok(None);
                };
                let pool = self.pool.clone();
                with_connection(pool, move |conn| {
                    use $crate::db::records::DbItem;
                    use $crate::db::schema::items::dsl::*;
                    use diesel::prelude::*;
                    items
                        .find(item_id)
                        .select(DbItem::as_select())
                        .first::<DbItem>(conn)
                        .optional()
                        .map(|value| value.map(Into::into))
                        .map_err(|e| $crate::db::DatabaseError::Query(e.to_string()))
                })
                .await
            }

            async fn count_items(&self) -> Result<i64, $crate::db::DatabaseError> {
                let pool = self.pool.clone();
                with_connection(pool, move |conn| {
                    use $crate::db::schema::items::dsl::*;
                    use diesel::prelude::*;
                    items
                        .count()
                        .get_result(conn)
                        .map_err(|e| $crate::db::DatabaseError::Query(e.to_string()))
                })
                .await
            }

            async fn create_item(
                &self,
                item: &$crate::db::NewItem,
            ) -> Result<$crate::db::Item, $crate::db::DatabaseError> {
                let item = item.clone();
                let pool = self.pool.clone();
                with_connection(pool, move |conn| {
                    use $crate::db::records::{DbItem, NewDbItem};
                    use $crate::db::schema::items;
                    use diesel::prelude::*;
                    diesel::insert_into(items::table)
                        .values(NewDbItem::from(&item))
                        .returning(DbItem::as_returning())
                        .get_result::<DbItem>(conn)
                        .map(Into::into)
                        .map_err(|e| $crate::db::DatabaseError::Query(e.to_string()))
                })
                .await
            }

            async fn update_item(
                &self,
                item_id: i64,
                changes: &$crate::db::ItemChanges,
            ) -> Result<Option<$crate::db::Item>, $crate::db::DatabaseError> {
                let Some(item_id) = $crate::db::records::storage_id(item_id) else {
                    return Ok(None);
                };
                let changes = changes.clone();
                let pool = self.pool.clone();
                with_connection(pool, move |conn| {
                    use $crate::db::records::{DbItem, ItemChangeset};
                    use $crate::db::schema::items::dsl::*;
                    use diesel::prelude::*;
                    // diesel refuses an UPDATE with an empty SET list
                    let updated = if changes.is_empty() {
                        items
                            .find(item_id)
                            .select(DbItem::as_select())
                            .first::<DbItem>(conn)
                            .optional()
                    } else {
                        diesel::update(items.find(item_id))
                            .set(ItemChangeset::from(&changes))
                            .returning(DbItem::as_returning())
                            .get_result::<DbItem>(conn)
                            .optional()
                    };

                    updated
                        .map(|value| value.map(Into::into))
                        .map_err(|e| $crate::db::DatabaseError::Query(e.to_string()))
                })
                .await
            }

            async fn delete_item(&self, item_id: i64) -> Result<bool, $crate::db::DatabaseError> {
                let Some(item_id) = $crate::db::records::storage_id(item_id) else {
                    return Ok(false);
                };
                let pool = self.pool.clone();
                with_connection(pool, move |conn| {
                    use $crate::db::schema::items::dsl::*;
                    use diesel::prelude::*;
                    diesel::delete(items.find(item_id))
                        .execute(conn)
                        .map(|deleted| deleted > 0)
                        .map_err(|e| $crate::db::DatabaseError::Query(e.to_string()))
                })
                .await
            }
        }
    };
}

pub(crate) use impl_item_store;
