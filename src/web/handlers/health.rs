use serde_json::json;
use salvo::prelude::*;

use crate::web::WebState;

#[handler]
pub async fn health_check(depot: &mut Depot, res: &mut Response) {
    let Ok(state) = depot.obtain::<WebState>() else {
        res.status_code(StatusCode::SERVICE_UNAVAILABLE);
        res.render(Json(json!({
            "status": "unavailable",
            "error": "web state is not injected",
        })));
        return;
    };

    let uptime_seconds = state.started_at.elapsed().as_secs();

    match state.db_manager.item_store().count_items().await {
        Ok(count) => {
            res.render(Json(json!({
                "status": "ok",
                "items": count,
                "database": format!("{:?}", state.db_manager.db_type()).to_lowercase(),
                "uptime_seconds": uptime_seconds,
                "version": env!("CARGO_PKG_VERSION"),
            })));
        }
        Err(err) => {
            tracing::warn!("health check failed: {}", err);
            res.status_code(StatusCode::SERVICE_UNAVAILABLE);
            res.render(Json(json!({
                "status": "unavailable",
                "error": "database unavailable",
            })));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::prelude::*;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;

    use crate::config::DatabaseConfig;
    use crate::db::DatabaseManager;
    use crate::web::{WebState, create_router};

    #[tokio::test]
    async fn health_reports_item_count() {
        let config = DatabaseConfig {
            url: Some("sqlite://:memory:".to_string()),
            ..DatabaseConfig::default()
        };
        let manager = DatabaseManager::new(&config).await.expect("db manager");
        manager.migrate().await.expect("migrate");
        let service = Service::new(create_router(WebState::new(Arc::new(manager))));

        let mut res = TestClient::get("http://127.0.0.1:8000/health")
            .send(&service)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: Value = res.take_json().await.expect("health json");
        assert_eq!(body["status"], "ok");
        assert_eq!(body["items"], 0);
        assert_eq!(body["database"], "sqlite");
    }

    #[tokio::test]
    async fn health_is_unavailable_before_migration() {
        let config = DatabaseConfig {
            url: Some("sqlite://:memory:".to_string()),
            ..DatabaseConfig::default()
        };
        let manager = DatabaseManager::new(&config).await.expect("db manager");
        let service = Service::new(create_router(WebState::new(Arc::new(manager))));

        let mut res = TestClient::get("http://127.0.0.1:8000/health")
            .send(&service)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));

        let body: Value = res.take_json().await.expect("health json");
        assert_eq!(body["status"], "unavailable");
        assert_eq!(body["error"], "database unavailable");
    }
}
