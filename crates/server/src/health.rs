use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use rolodex_store::RecordStore;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    store: Arc<dyn RecordStore>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub store: HealthCheck,
    pub checked_at: String,
}

pub fn router(store: Arc<dyn RecordStore>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { store })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let store = store_check(state.store.as_ref()).await;
    let ready = store.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "rolodex-server runtime initialized".to_string(),
        },
        store,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn store_check(store: &dyn RecordStore) -> HealthCheck {
    // Equality probe on an id no row carries keeps the response tiny.
    match store.search(&[("id".to_string(), "0".to_string())]).await {
        Ok(_) => {
            HealthCheck { status: "ready", detail: "record store query succeeded".to_string() }
        }
        Err(error) => HealthCheck {
            status: "degraded",
            detail: format!("record store query failed: {error}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use rolodex_store::{FailingRecordStore, InMemoryRecordStore};

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn health_returns_ready_when_store_is_reachable() {
        let store = Arc::new(InMemoryRecordStore::default());

        let (status, Json(payload)) = health(State(HealthState { store })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.store.status, "ready");
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_when_store_is_down() {
        let store = Arc::new(FailingRecordStore);

        let (status, Json(payload)) = health(State(HealthState { store })).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.store.status, "degraded");
        assert_eq!(payload.service.status, "ready");
    }
}
