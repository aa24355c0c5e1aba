use salvo::http::ParseError;
use salvo::prelude::*;
use salvo::writing::Scribe;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::DatabaseError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn item_not_found() -> Self {
        Self::NotFound("Item not found".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(value: DatabaseError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<ParseError> for ApiError {
    fn from(value: ParseError) -> Self {
        Self::Validation(format!("invalid request body: {value}"))
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        let detail = match self {
            Self::Internal(ref message) => {
                error!("request failed: {}", message);
                "internal server error".to_string()
            }
            ref other => other.to_string(),
        };

        res.status_code(self.status_code());
        res.render(Json(json!({ "detail": detail })));
    }
}
