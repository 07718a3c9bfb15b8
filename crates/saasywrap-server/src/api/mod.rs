// ABOUTME: API module containing all HTTP handler functions for the saasywrap REST API.
// ABOUTME: Organized into sub-modules per agent: requirements, blueprint, and plans.

pub mod blueprint;
pub mod plans;
pub mod requirements;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use saasywrap_agent::ModelError;

/// Map a model transport failure onto an HTTP response. Rate limits become
/// 429; everything else from the provider is a 502.
pub(crate) fn model_error_response(error: ModelError) -> Response {
    let status = match error {
        ModelError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::BAD_GATEWAY,
    };
    tracing::error!(%error, "model call failed");
    (
        status,
        Json(serde_json::json!({ "error": error.to_string() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use crate::app_state::{AppState, SharedState};
    use crate::routes::create_router;
    use axum::body::Body;
    use axum::http::StatusCode;
    use http::Request;
    use saasywrap_agent::{ChatModel, ChatRequest, ModelError};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Model double whose every call reports a provider rate limit.
    struct RateLimitedModel;

    #[async_trait::async_trait]
    impl ChatModel for RateLimitedModel {
        async fn complete(&self, _request: &ChatRequest) -> Result<Vec<String>, ModelError> {
            Err(ModelError::RateLimited)
        }

        fn model_name(&self) -> &str {
            "rate-limited-model"
        }
    }

    fn rate_limited_state() -> SharedState {
        let dir = tempfile::TempDir::new().unwrap();
        Arc::new(AppState::new(
            Arc::new(RateLimitedModel),
            dir.keep(),
            3,
            16 * 1024 * 1024,
        ))
    }

    #[tokio::test]
    async fn rate_limited_model_maps_to_429() {
        let app = create_router(rate_limited_state());

        let body = serde_json::json!({ "message": "anything" });
        let resp = app
            .oneshot(
                Request::post("/api/chat/requirements")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Rate limited");
    }
}
