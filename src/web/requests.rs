use serde::{Deserialize, Deserializer};

use super::error::ApiError;
use crate::db::{ItemChanges, NewItem};

pub const TITLE_MAX_CHARS: usize = 100;

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl CreateItemRequest {
    pub fn validate(self) -> Result<NewItem, ApiError> {
        validate_title(&self.title)?;
        Ok(NewItem {
            title: self.title,
            description: self.description,
            completed: self.completed,
        })
    }
}

/// Body of `PUT /items/{id}`. Each field is `None` when absent from the
/// JSON object and `Some(None)` when sent as an explicit `null`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub completed: Option<Option<bool>>,
}

impl UpdateItemRequest {
    pub fn validate(self) -> Result<ItemChanges, ApiError> {
        let title = match self.title {
            None => None,
            Some(None) => return Err(ApiError::Validation("title cannot be null".to_string())),
            Some(Some(title)) => {
                validate_title(&title)?;
                Some(title)
            }
        };

        let completed = match self.completed {
            None => None,
            Some(None) => {
                return Err(ApiError::Validation("completed cannot be null".to_string()));
            }
            Some(value) => value,
        };

        Ok(ItemChanges {
            title,
            description: self.description,
            completed,
        })
    }
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::Validation("title must not be empty".to_string()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(ApiError::Validation(format!(
            "title must be at most {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    fn create(value: serde_json::Value) -> Result<NewItem, ApiError> {
        serde_json::from_value::<CreateItemRequest>(value)
            .expect("payload shape")
            .validate()
    }

    fn update(value: serde_json::Value) -> Result<ItemChanges, ApiError> {
        serde_json::from_value::<UpdateItemRequest>(value)
            .expect("payload shape")
            .validate()
    }

    #[test]
    fn create_defaults_optional_fields() {
        let item = create(json!({ "title": "laundry" })).expect("valid");
        assert_eq!(item.title, "laundry");
        assert_eq!(item.description, None);
        assert!(!item.completed);
    }

    #[test]
    fn create_requires_title() {
        assert!(serde_json::from_value::<CreateItemRequest>(json!({ "completed": true })).is_err());
        assert!(serde_json::from_value::<CreateItemRequest>(json!({ "title": null })).is_err());
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "whitespace only")]
    #[test_case(&"x".repeat(101) ; "too long")]
    fn create_rejects_bad_titles(title: &str) {
        let err = create(json!({ "title": title })).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test_case(&"x".repeat(100) ; "ascii at limit")]
    #[test_case(&"é".repeat(100) ; "multibyte at limit")]
    fn create_accepts_titles_up_to_the_limit(title: &str) {
        create(json!({ "title": title })).expect("title at limit is valid");
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let changes = update(json!({ "description": null })).expect("valid");
        assert_eq!(changes.description, Some(None));
        assert_eq!(changes.title, None);
        assert_eq!(changes.completed, None);

        let changes = update(json!({})).expect("valid");
        assert!(changes.is_empty());
    }

    #[test]
    fn update_passes_through_given_fields() {
        let changes = update(json!({
            "title": "renamed",
            "description": "details",
            "completed": true,
        }))
        .expect("valid");
        assert_eq!(changes.title.as_deref(), Some("renamed"));
        assert_eq!(changes.description, Some(Some("details".to_string())));
        assert_eq!(changes.completed, Some(true));
    }

    #[test_case(json!({ "title": null }) ; "null title")]
    #[test_case(json!({ "completed": null }) ; "null completed")]
    #[test_case(json!({ "title": "" }) ; "empty title")]
    fn update_rejects_invalid_fields(value: serde_json::Value) {
        let err = update(value).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
