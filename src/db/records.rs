use diesel::prelude::*;

use super::models::{Item, ItemChanges, NewItem};
use super::schema::items;

// Both backends store the key as a 32-bit INTEGER; the API speaks i64.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
pub(crate) struct DbItem {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

impl From<DbItem> for Item {
    fn from(value: DbItem) -> Self {
        Self {
            id: i64::from(value.id),
            title: value.title,
            description: value.description,
            completed: value.completed,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = items)]
pub(crate) struct NewDbItem<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub completed: bool,
}

impl<'a> From<&'a NewItem> for NewDbItem<'a> {
    fn from(value: &'a NewItem) -> Self {
        Self {
            title: &value.title,
            description: value.description.as_deref(),
            completed: value.completed,
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = items)]
pub(crate) struct ItemChangeset<'a> {
    pub title: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub completed: Option<bool>,
}

impl<'a> From<&'a ItemChanges> for ItemChangeset<'a> {
    fn from(value: &'a ItemChanges) -> Self {
        Self {
            title: value.title.as_deref(),
            description: value.description.as_ref().map(|d| d.as_deref()),
            completed: value.completed,
        }
    }
}

/// Ids that do not fit the column type cannot exist in storage.
pub(crate) fn storage_id(id: i64) -> Option<i32> {
    i32::try_from(id).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_id_rejects_out_of_range_values() {
        assert_eq!(storage_id(42), Some(42));
        assert_eq!(storage_id(i64::from(i32::MAX) + 1), None);
        assert_eq!(storage_id(i64::MIN), None);
    }

    #[test]
    fn changeset_borrows_nested_description() {
        let changes = ItemChanges {
            title: None,
            description: Some(None),
            completed: Some(true),
        };
        let changeset = ItemChangeset::from(&changes);
        assert_eq!(changeset.title, None);
        assert_eq!(changeset.description, Some(None));
        assert_eq!(changeset.completed, Some(true));
    }
}
