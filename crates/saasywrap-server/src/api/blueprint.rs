// ABOUTME: Handlers for blueprint generation, transform execution, and blueprint chat.
// ABOUTME: The client owns the displayed blueprint; every request carries the current state.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::Value;

use saasywrap_agent::BlueprintAgent;
use saasywrap_core::{ChatMessage, Requirement, Transform};

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
    transform_id: String,
    #[serde(default)]
    preview_state: Value,
    #[serde(default)]
    current_blueprint: Vec<Transform>,
    #[serde(default)]
    requirements: Vec<Requirement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatRequestBody {
    message: String,
    #[serde(default)]
    current_blueprint: Vec<Transform>,
    #[serde(default)]
    chat_history: Vec<ChatMessage>,
    #[serde(default)]
    requirements: Vec<Requirement>,
}

/// POST /api/generate-blueprint - Derive implementation transforms from the
/// current requirements list.
pub async fn generate(
    State(state): State<SharedState>,
    Json(body): Json<GenerateRequest>,
) -> Response {
    let mut agent = BlueprintAgent::new(state.model.clone());

    match agent.generate_initial(body.requirements).await {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => model_error_response(e),
    }
}

/// POST /api/execute-blueprint-transform - Execute one transform against the
/// blueprint the client sends along. The outcome carries the preview fragment
/// and the state to round-trip into the next execution.
pub async fn execute(
    State(state): State<SharedState>,
    Json(body): Json<ExecuteRequest>,
) -> Response {
    let mut agent = BlueprintAgent::new(state.model.clone());
    agent.blueprint = body.current_blueprint;
    agent.requirements = body.requirements;

    match agent
        .execute_transform(&body.transform_id, body.preview_state)
        .await
    {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => model_error_response(e),
    }
}

/// POST /api/chat/blueprint - Process one chat turn and return the change set
/// for the client to apply.
pub async fn chat(State(state): State<SharedState>, Json(body): Json<ChatRequestBody>) -> Response {
    let mut agent = BlueprintAgent::new(state.model.clone());
    agent.blueprint = body.current_blueprint;
    agent.requirements = body.requirements;
    agent.history = body.chat_history;

    match agent.process_message(&body.message).await {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => model_error_response(e),
    }
}
