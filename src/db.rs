pub use self::error::DatabaseError;
pub use self::manager::DatabaseManager;
pub use self::models::{Item, ItemChanges, NewItem};
pub use self::stores::ItemStore;

pub mod error;
pub mod manager;
pub mod models;
mod records;
pub mod schema;
pub mod stores;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "sqlite")]
pub mod sqlite;
