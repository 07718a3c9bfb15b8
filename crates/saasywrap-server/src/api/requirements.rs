// ABOUTME: Handlers for initial requirements generation (JSON or multipart upload) and requirements chat.
// ABOUTME: Each request builds a fresh RequirementsAgent; all conversation state arrives in the body.

use std::path::{Path, PathBuf};

use axum::Json;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use saasywrap_agent::{DatasetSummary, RequirementsAgent};
use saasywrap_core::{ChatMessage, Requirement};

use crate::api::model_error_response;
use crate::app_state::SharedState;

/// JSON body for `/api/generate-requirements` when no dataset is attached.
#[derive(Debug, Default, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    requirements: String,
}

/// Request body for `/api/chat/requirements`. The client round-trips the
/// full conversation state on every turn.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestBody {
    pub message: String,
    #[serde(default)]
    pub current_requirements: Vec<Requirement>,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
    #[serde(default)]
    pub initial_context: InitialContext,
}

/// The context captured when requirements were first generated.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialContext {
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub dataset_path: Option<String>,
}

/// POST /api/generate-requirements - Generate initial requirements from a
/// free-text description, optionally grounded in an uploaded dataset.
/// Accepts either a JSON body or multipart form data with a `dataset` file.
pub async fn generate(State(state): State<SharedState>, request: Request) -> Response {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let (description, dataset) = if content_type.starts_with("multipart/form-data") {
        match read_upload(&state, request).await {
            Ok(parts) => parts,
            Err(response) => return response,
        }
    } else {
        let bytes =
            match axum::body::to_bytes(request.into_body(), state.max_upload_bytes).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(serde_json::json!({ "error": format!("failed to read body: {}", e) })),
                    )
                        .into_response();
                }
            };
        let body: GenerateRequest = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": format!("invalid JSON body: {}", e) })),
                )
                    .into_response();
            }
        };
        (body.requirements, None)
    };

    let mut agent = RequirementsAgent::new(state.model.clone(), state.choice_count);
    let dataset_path = dataset.map(|(path, summary)| {
        agent.dataset = Some(summary);
        path
    });

    let requirements = match agent.generate_initial(&description).await {
        Ok(requirements) => requirements.to_vec(),
        Err(e) => return model_error_response(e),
    };

    let mut response = serde_json::json!({
        "requirements": requirements,
        "response": agent.initial_response(),
    });
    if let Some(path) = dataset_path {
        response["datasetPath"] = serde_json::json!(path.to_string_lossy());
    }

    Json(response).into_response()
}

/// POST /api/chat/requirements - Process one chat turn against the restored
/// requirements state and return the updated list.
pub async fn chat(
    State(state): State<SharedState>,
    Json(body): Json<ChatRequestBody>,
) -> Response {
    let mut agent = RequirementsAgent::new(state.model.clone(), state.choice_count);
    agent.requirements = body.current_requirements;
    agent.history = body.chat_history;
    agent.initial_description = body.initial_context.requirements;

    if let Some(ref dataset_path) = body.initial_context.dataset_path {
        match load_dataset(&state, dataset_path) {
            Ok(summary) => agent.dataset = summary,
            Err(response) => return response,
        }
    }

    let response = match agent.process_message(&body.message).await {
        Ok(response) => response,
        Err(e) => return model_error_response(e),
    };

    Json(serde_json::json!({
        "response": response,
        "requirements": agent.requirements,
    }))
    .into_response()
}

/// Pull the description text and optional dataset file out of a multipart
/// upload. The file is persisted under the upload directory so later chat
/// turns can re-read it by path.
async fn read_upload(
    state: &SharedState,
    request: Request,
) -> Result<(String, Option<(PathBuf, DatasetSummary)>), Response> {
    let mut multipart = Multipart::from_request(request, &()).await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": format!("invalid multipart body: {}", e) })),
        )
            .into_response()
    })?;

    let mut description = String::new();
    let mut dataset = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": format!("invalid multipart body: {}", e) })),
                )
                    .into_response());
            }
        };

        match field.name() {
            Some("requirements") => {
                description = field.text().await.unwrap_or_default();
            }
            Some("dataset") => {
                let filename = secure_filename(field.file_name().unwrap_or("dataset"));
                let bytes = match field.bytes().await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        return Err((
                            StatusCode::BAD_REQUEST,
                            Json(serde_json::json!({ "error": format!("failed to read upload: {}", e) })),
                        )
                            .into_response());
                    }
                };

                if let Err(e) = std::fs::create_dir_all(&state.upload_dir) {
                    tracing::error!("failed to create upload directory: {}", e);
                    return Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(serde_json::json!({ "error": "failed to store upload" })),
                    )
                        .into_response());
                }

                let path = state.upload_dir.join(filename);
                if let Err(e) = std::fs::write(&path, &bytes) {
                    tracing::error!("failed to write upload: {}", e);
                    return Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(serde_json::json!({ "error": "failed to store upload" })),
                    )
                        .into_response());
                }

                let summary = DatasetSummary::from_path(&path).map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(serde_json::json!({ "error": e.to_string() })),
                    )
                        .into_response()
                })?;
                dataset = Some((path, summary));
            }
            _ => {}
        }
    }

    Ok((description, dataset))
}

/// Re-read a previously uploaded dataset for a chat turn. The path must
/// resolve inside the upload directory; a missing file just means no dataset
/// context, while an unreadable one is the caller's error.
fn load_dataset(state: &SharedState, dataset_path: &str) -> Result<Option<DatasetSummary>, Response> {
    let path = Path::new(dataset_path);

    let inside_upload_dir = path
        .parent()
        .is_some_and(|parent| parent == state.upload_dir)
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n == secure_filename(n));
    if !inside_upload_dir {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "datasetPath must point into the upload directory" })),
        )
            .into_response());
    }

    if !path.exists() {
        tracing::warn!(dataset_path, "dataset file no longer exists, continuing without it");
        return Ok(None);
    }

    match DatasetSummary::from_path(path) {
        Ok(summary) => Ok(Some(summary)),
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response()),
    }
}

/// Reduce an uploaded filename to a safe basename: path separators and
/// anything outside [A-Za-z0-9._-] become underscores, and leading dots are
/// stripped so uploads cannot hide or escape.
fn secure_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches(['.', '_']).to_string();
    if trimmed.is_empty() {
        "dataset".to_string()
    } else {
        trimmed
    }
}
