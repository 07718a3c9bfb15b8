// ABOUTME: Handlers for plan generation, plan-step execution, and plan chat.
// ABOUTME: Mirrors the blueprint handlers but over flat plan steps instead of transforms.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::Value;

use saasywrap_agent::PlanAgent;
use saasywrap_core::{ChatMessage, PlanStep, Requirement};

use crate::api::model_error_response;
use crate::app_state::SharedState;

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateRequest {
    #[serde(default)]
    requirements: Vec<Requirement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExecuteRequest {
    step_id: String,
    #[serde(default)]
    preview_state: Value,
    #[serde(default)]
    current_plans: Vec<PlanStep>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatRequestBody {
    message: String,
    #[serde(default)]
    current_plans: Vec<PlanStep>,
    #[serde(default)]
    chat_history: Vec<ChatMessage>,
}

/// POST /api/generate-plan - Derive a dependency-ordered implementation plan
/// from the current requirements list.
pub async fn generate(
    State(state): State<SharedState>,
    Json(body): Json<GenerateRequest>,
) -> Response {
    let mut agent = PlanAgent::new(state.model.clone());

    match agent.generate_initial(&body.requirements).await {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => model_error_response(e),
    }
}

/// POST /api/execute-plan-step - Execute one step against the plan the client
/// sends along.
pub async fn execute(
    State(state): State<SharedState>,
    Json(body): Json<ExecuteRequest>,
) -> Response {
    let mut agent = PlanAgent::new(state.model.clone());
    agent.plans = body.current_plans;

    match agent.execute_step(&body.step_id, body.preview_state).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => model_error_response(e),
    }
}

/// POST /api/chat/plans - Process one chat turn; the reply carries the whole
/// updated plan list when the model changed it.
pub async fn chat(State(state): State<SharedState>, Json(body): Json<ChatRequestBody>) -> Response {
    let mut agent = PlanAgent::new(state.model.clone());
    agent.plans = body.current_plans;
    agent.history = body.chat_history;

    match agent.process_message(&body.message).await {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => model_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;
    use crate::routes::create_router;
    use axum::body::Body;
    use http::{Request as HttpRequest, StatusCode};
    use saasywrap_agent::StubModel;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state(model: StubModel) -> SharedState {
        let dir = tempfile::TempDir::new().unwrap();
        Arc::new(AppState::new(Arc::new(model), dir.keep(), 3, 16 * 1024 * 1024))
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn step_json(id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": "Generate Database Schema",
            "description": "Create the initial database schema",
            "status": "pending",
            "type": "database",
            "estimated_time": "10 minutes",
            "dependencies": []
        })
    }

    #[tokio::test]
    async fn generate_returns_plan() {
        let reply = serde_json::json!({
            "response": "One step covers this.",
            "plans": [step_json("step-1")]
        })
        .to_string();
        let app = create_router(test_state(StubModel::single(&reply)));

        let resp = app
            .oneshot(
                HttpRequest::post("/api/generate-plan")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({ "requirements": [] }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["plans"].as_array().unwrap().len(), 1);
        assert_eq!(json["plans"][0]["type"], "database");
    }

    #[tokio::test]
    async fn execute_runs_step_from_supplied_plan() {
        let outcome = serde_json::json!({
            "preview": "<div>schema</div>",
            "status": "completed",
            "message": "Step completed successfully"
        })
        .to_string();
        let app = create_router(test_state(StubModel::single(&outcome)));

        let body = serde_json::json!({
            "stepId": "step-1",
            "previewState": {},
            "currentPlans": [step_json("step-1")]
        });

        let resp = app
            .oneshot(
                HttpRequest::post("/api/execute-plan-step")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["status"], "completed");
    }

    #[tokio::test]
    async fn execute_unknown_step_reports_failure() {
        let app = create_router(test_state(StubModel::new(vec![])));

        let body = serde_json::json!({
            "stepId": "step-404",
            "currentPlans": []
        });

        let resp = app
            .oneshot(
                HttpRequest::post("/api/execute-plan-step")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["status"], "failed");
        assert_eq!(json["message"], "Step not found");
    }

    #[tokio::test]
    async fn chat_returns_updated_plan_list() {
        let reply = serde_json::json!({
            "response": "I've split the step in two.",
            "plans": [step_json("step-1"), step_json("step-2")]
        })
        .to_string();
        let app = create_router(test_state(StubModel::single(&reply)));

        let body = serde_json::json!({
            "message": "split the first step",
            "currentPlans": [step_json("step-1")],
            "chatHistory": []
        });

        let resp = app
            .oneshot(
                HttpRequest::post("/api/chat/plans")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = json_body(resp).await;
        assert_eq!(json["plans"].as_array().unwrap().len(), 2);
    }
}
