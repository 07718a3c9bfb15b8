// ABOUTME: Route definitions for the saasywrap HTTP API.
// ABOUTME: Assembles all API routes into a single Axum Router with shared state.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;

/// Build the complete Axum router with all routes and shared state.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/generate-requirements", post(api::requirements::generate))
        .route("/api/chat/requirements", post(api::requirements::chat))
        .route("/api/generate-blueprint", post(api::blueprint::generate))
        .route(
            "/api/execute-blueprint-transform",
            post(api::blueprint::execute),
        )
        .route("/api/chat/blueprint", post(api::blueprint::chat))
        .route("/api/generate-plan", post(api::plans::generate))
        .route("/api/execute-plan-step", post(api::plans::execute))
        .route("/api/chat/plans", post(api::plans::chat))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;
    use axum::body::Body;
    use http::Request;
    use saasywrap_agent::StubModel;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> SharedState {
        let dir = tempfile::TempDir::new().unwrap();
        Arc::new(AppState::new(
            Arc::new(StubModel::new(vec![])),
            dir.keep(),
            3,
            16 * 1024 * 1024,
        ))
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = create_router(test_state());
        let resp = app
            .oneshot(
                Request::post("/api/generate-everything")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), 404);
    }
}
