use std::sync::Arc;

use salvo::prelude::*;
use tracing::debug;

use crate::db::{Item, ItemStore};
use crate::web::WebState;
use crate::web::error::ApiError;
use crate::web::requests::{CreateItemRequest, UpdateItemRequest};

fn item_store(depot: &Depot) -> Result<Arc<dyn ItemStore>, ApiError> {
    depot
        .obtain::<WebState>()
        .map(|state| state.db_manager.item_store())
        .map_err(|_| ApiError::Internal("web state is not injected".to_string()))
}

fn item_id(req: &Request) -> Result<i64, ApiError> {
    req.param::<i64>("id")
        .ok_or_else(|| ApiError::Validation("item id must be an integer".to_string()))
}

#[handler]
pub async fn list_items(depot: &mut Depot, res: &mut Response) {
    let result = match item_store(depot) {
        Ok(store) => store.list_items().await.map_err(ApiError::from),
        Err(err) => Err(err),
    };

    match result {
        Ok(items) => res.render(Json(items)),
        Err(err) => res.render(err),
    }
}

#[handler]
pub async fn create_item(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match create(req, depot).await {
        Ok(item) => {
            res.status_code(StatusCode::CREATED);
            res.render(Json(item));
        }
        Err(err) => res.render(err),
    }
}

async fn create(req: &mut Request, depot: &Depot) -> Result<Item, ApiError> {
    let new_item = req.parse_json::<CreateItemRequest>().await?.validate()?;
    let item = item_store(depot)?.create_item(&new_item).await?;
    debug!(item_id = item.id, "created item");
    Ok(item)
}

#[handler]
pub async fn get_item(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match fetch(req, depot).await {
        Ok(item) => res.render(Json(item)),
        Err(err) => res.render(err),
    }
}

async fn fetch(req: &Request, depot: &Depot) -> Result<Item, ApiError> {
    let id = item_id(req)?;
    item_store(depot)?
        .get_item(id)
        .await?
        .ok_or_else(ApiError::item_not_found)
}

#[handler]
pub async fn update_item(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match update(req, depot).await {
        Ok(item) => res.render(Json(item)),
        Err(err) => res.render(err),
    }
}

async fn update(req: &mut Request, depot: &Depot) -> Result<Item, ApiError> {
    let id = item_id(req)?;
    let changes = req.parse_json::<UpdateItemRequest>().await?.validate()?;
    let item = item_store(depot)?
        .update_item(id, &changes)
        .await?
        .ok_or_else(ApiError::item_not_found)?;
    debug!(item_id = item.id, "updated item");
    Ok(item)
}

#[handler]
pub async fn delete_item(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match delete(req, depot).await {
        Ok(()) => {
            res.status_code(StatusCode::NO_CONTENT);
        }
        Err(err) => res.render(err),
    }
}

async fn delete(req: &Request, depot: &Depot) -> Result<(), ApiError> {
    let id = item_id(req)?;
    if !item_store(depot)?.delete_item(id).await? {
        return Err(ApiError::item_not_found());
    }
    debug!(item_id = id, "deleted item");
    Ok(())
}
