// ABOUTME: The blueprint agent: derives implementation transforms from requirements,
// ABOUTME: executes individual transforms into preview updates, and refines the blueprint via chat.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use saasywrap_core::chat::ChatMessage;
use saasywrap_core::{Requirement, Transform, TransformChange, WorkStatus};

use crate::choices::{ChoiceError, first_valid};
use crate::client::{ChatModel, ChatRequest, ModelError};
use crate::prompts;

const FALLBACK_BLUEPRINT_RESPONSE: &str =
    "Sorry, there was an error generating the blueprint. Please try again.";

const FALLBACK_CHAT_RESPONSE: &str = "Sorry, there was an error processing your message.";

/// Reply to an initial blueprint generation: the transform list plus the
/// model's explanation.
#[derive(Debug, Serialize, Deserialize)]
pub struct BlueprintReply {
    pub response: String,
    pub blueprint: Vec<Transform>,
}

/// Reply to a blueprint chat turn. Changes are validated here but applied by
/// the client, which owns the displayed list.
#[derive(Debug, Serialize, Deserialize)]
pub struct BlueprintChatReply {
    pub response: String,
    #[serde(default)]
    pub changes: Vec<TransformChange>,
}

/// Result of executing a single transform or plan step: a preview fragment,
/// a status, a user-facing message, and opaque state the client round-trips
/// into the next execution.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    #[serde(default)]
    pub preview: Option<String>,
    pub status: WorkStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_state: Option<Value>,
}

impl ExecutionOutcome {
    /// A failed outcome with no preview, used when lookup or parsing fails.
    pub fn failed(message: &str) -> Self {
        Self {
            preview: None,
            status: WorkStatus::Failed,
            message: message.to_string(),
            preview_state: None,
        }
    }
}

/// Agent owning the blueprint list. Like the requirements agent, all state
/// that survives across requests is public and restored from request bodies.
pub struct BlueprintAgent {
    model: Arc<dyn ChatModel>,
    pub blueprint: Vec<Transform>,
    pub history: Vec<ChatMessage>,
    pub requirements: Vec<Requirement>,
}

impl BlueprintAgent {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            blueprint: Vec::new(),
            history: Vec::new(),
            requirements: Vec::new(),
        }
    }

    /// Generate the initial blueprint from the given requirements. A reply
    /// that fails to parse yields an empty blueprint with a canned message,
    /// not an error.
    pub async fn generate_initial(
        &mut self,
        requirements: Vec<Requirement>,
    ) -> Result<BlueprintReply, ModelError> {
        self.requirements = requirements;

        let prompt = prompts::initial_blueprint(&self.requirements);
        let choices = self
            .model
            .complete(&ChatRequest::json(prompts::PLANNING_SYSTEM, &prompt))
            .await?;

        match first_valid(&choices, parse_blueprint_reply) {
            Some(reply) => {
                self.blueprint = reply.blueprint.clone();
                Ok(reply)
            }
            None => {
                tracing::warn!("no valid completion choice for blueprint generation");
                self.blueprint.clear();
                Ok(BlueprintReply {
                    response: FALLBACK_BLUEPRINT_RESPONSE.to_string(),
                    blueprint: Vec::new(),
                })
            }
        }
    }

    /// Execute one transform by id. Unknown ids produce a failed outcome
    /// ("Transform not found") without a model call; parse failures after a
    /// successful call produce a failed outcome as well.
    pub async fn execute_transform(
        &mut self,
        transform_id: &str,
        preview_state: Value,
    ) -> Result<ExecutionOutcome, ModelError> {
        let Some(transform) = self.blueprint.iter_mut().find(|t| t.id == transform_id) else {
            return Ok(ExecutionOutcome::failed("Transform not found"));
        };

        transform.status = WorkStatus::InProgress;
        let prompt = prompts::transform_execution(transform, &self.requirements, &preview_state);

        let choices = self
            .model
            .complete(&ChatRequest::json(prompts::IMPLEMENTATION_SYSTEM, &prompt))
            .await?;

        match first_valid(&choices, parse_outcome) {
            Some(outcome) => Ok(outcome),
            None => {
                tracing::warn!(transform_id, "no valid completion choice for transform execution");
                Ok(ExecutionOutcome::failed("Error executing transform"))
            }
        }
    }

    /// Process one blueprint chat turn. The returned changes are handed back
    /// to the client verbatim; the server does not mutate its copy.
    pub async fn process_message(&mut self, message: &str) -> Result<BlueprintChatReply, ModelError> {
        let prompt =
            prompts::blueprint_chat(&self.blueprint, &self.requirements, &self.history, message);

        let choices = self
            .model
            .complete(&ChatRequest::json(prompts::PLANNING_SYSTEM, &prompt))
            .await?;

        match first_valid(&choices, parse_chat_reply) {
            Some(reply) => Ok(reply),
            None => {
                tracing::warn!("no valid completion choice for blueprint chat turn");
                Ok(BlueprintChatReply {
                    response: FALLBACK_CHAT_RESPONSE.to_string(),
                    changes: Vec::new(),
                })
            }
        }
    }
}

fn parse_blueprint_reply(text: &str) -> Result<BlueprintReply, ChoiceError> {
    Ok(serde_json::from_str(text)?)
}

fn parse_chat_reply(text: &str) -> Result<BlueprintChatReply, ChoiceError> {
    Ok(serde_json::from_str(text)?)
}

fn parse_outcome(text: &str) -> Result<ExecutionOutcome, ChoiceError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubModel;
    use saasywrap_core::requirement::{Importance, RequirementDraft};

    fn requirement(title: &str) -> Requirement {
        Requirement::from_draft(
            RequirementDraft {
                title: title.to_string(),
                description: format!("{} description", title),
                importance: Importance::High,
                category: "backend".to_string(),
                tags: vec![],
            },
            "ai-agent",
            "test fixture",
        )
    }

    fn blueprint_json(requirement_id: &str) -> String {
        serde_json::json!({
            "response": "I've broken down the implementation into 2 transforms.",
            "blueprint": [
                {
                    "id": "transform-1",
                    "title": "Generate User Table Schema",
                    "description": "Create the initial database schema",
                    "status": "pending",
                    "estimated_time": "10 minutes",
                    "dependencies": [],
                    "requirement_ids": [requirement_id],
                    "transform_type": "schema"
                },
                {
                    "id": "transform-2",
                    "title": "Build Account Form",
                    "description": "CRUD form over the user table",
                    "status": "pending",
                    "estimated_time": "20 minutes",
                    "dependencies": ["transform-1"],
                    "requirement_ids": [requirement_id],
                    "transform_type": "form"
                }
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn generate_initial_stores_blueprint() {
        let req = requirement("User Accounts");
        let model = StubModel::new(vec![vec![blueprint_json(&req.id)]]);
        let mut agent = BlueprintAgent::new(Arc::new(model));

        let reply = agent.generate_initial(vec![req]).await.unwrap();

        assert_eq!(reply.blueprint.len(), 2);
        assert_eq!(agent.blueprint.len(), 2);
        assert_eq!(reply.blueprint[1].dependencies, vec!["transform-1"]);
    }

    #[tokio::test]
    async fn generate_initial_falls_back_on_bad_reply() {
        let model = StubModel::new(vec![vec!["not json".to_string()]]);
        let mut agent = BlueprintAgent::new(Arc::new(model));

        let reply = agent.generate_initial(vec![]).await.unwrap();

        assert!(reply.blueprint.is_empty());
        assert_eq!(reply.response, FALLBACK_BLUEPRINT_RESPONSE);
    }

    #[tokio::test]
    async fn execute_unknown_transform_fails_without_model_call() {
        // Empty stub queue: any model call would error, proving none happened.
        let model = StubModel::new(vec![]);
        let mut agent = BlueprintAgent::new(Arc::new(model));

        let outcome = agent
            .execute_transform("transform-404", serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(outcome.status, WorkStatus::Failed);
        assert_eq!(outcome.message, "Transform not found");
        assert!(outcome.preview.is_none());
    }

    #[tokio::test]
    async fn execute_transform_marks_in_progress_and_parses_outcome() {
        let req = requirement("User Accounts");
        let outcome_json = serde_json::json!({
            "preview": "<div>Users table created</div>",
            "status": "completed",
            "message": "Transform completed successfully",
            "preview_state": { "tables": ["users"] }
        })
        .to_string();

        let model = StubModel::new(vec![vec![blueprint_json(&req.id)], vec![outcome_json]]);
        let mut agent = BlueprintAgent::new(Arc::new(model));
        agent.generate_initial(vec![req]).await.unwrap();

        let outcome = agent
            .execute_transform("transform-1", serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(outcome.status, WorkStatus::Completed);
        assert_eq!(outcome.preview.as_deref(), Some("<div>Users table created</div>"));
        assert_eq!(agent.blueprint[0].status, WorkStatus::InProgress);
    }

    #[tokio::test]
    async fn execute_transform_parse_failure_yields_failed_outcome() {
        let req = requirement("User Accounts");
        let model = StubModel::new(vec![
            vec![blueprint_json(&req.id)],
            vec!["<html>definitely not json</html>".to_string()],
        ]);
        let mut agent = BlueprintAgent::new(Arc::new(model));
        agent.generate_initial(vec![req]).await.unwrap();

        let outcome = agent
            .execute_transform("transform-1", serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(outcome.status, WorkStatus::Failed);
        assert_eq!(outcome.message, "Error executing transform");
    }

    #[tokio::test]
    async fn process_message_returns_changes_without_applying() {
        let chat_json = serde_json::json!({
            "response": "I'll add a dashboard transform.",
            "changes": [
                {
                    "type": "add",
                    "transform": {
                        "id": "transform-9",
                        "title": "Metrics Dashboard",
                        "description": "Aggregate usage dashboard",
                        "status": "pending",
                        "estimated_time": "45 minutes",
                        "dependencies": [],
                        "requirement_ids": [],
                        "transform_type": "dashboard"
                    }
                }
            ]
        })
        .to_string();

        let model = StubModel::new(vec![vec![chat_json]]);
        let mut agent = BlueprintAgent::new(Arc::new(model));

        let reply = agent.process_message("add a dashboard").await.unwrap();

        assert_eq!(reply.changes.len(), 1);
        assert!(
            agent.blueprint.is_empty(),
            "blueprint chat changes are applied client-side"
        );
    }

    #[tokio::test]
    async fn process_message_falls_back_on_bad_reply() {
        let model = StubModel::new(vec![vec!["oops".to_string()]]);
        let mut agent = BlueprintAgent::new(Arc::new(model));

        let reply = agent.process_message("anything").await.unwrap();

        assert_eq!(reply.response, FALLBACK_CHAT_RESPONSE);
        assert!(reply.changes.is_empty());
    }
}
