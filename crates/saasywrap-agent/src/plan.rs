// ABOUTME: The plan agent: derives an implementation plan from requirements, executes
// ABOUTME: individual steps, and refines the plan via chat (the model returns whole updated lists).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use saasywrap_core::chat::ChatMessage;
use saasywrap_core::{PlanStep, Requirement, WorkStatus};

use crate::blueprint::ExecutionOutcome;
use crate::choices::{ChoiceError, first_valid};
use crate::client::{ChatModel, ChatRequest, ModelError};
use crate::prompts;

const FALLBACK_PLAN_RESPONSE: &str =
    "Sorry, there was an error generating the plan. Please try again.";

const FALLBACK_CHAT_RESPONSE: &str = "Sorry, there was an error processing your message.";

/// Reply to an initial plan generation.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanReply {
    pub response: String,
    pub plans: Vec<PlanStep>,
}

/// Reply to a plan chat turn. Unlike the blueprint, the model returns the
/// whole updated plan list (and optionally a preview fragment) rather than a
/// change set.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanChatReply {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plans: Option<Vec<PlanStep>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Agent owning the plan-step list.
pub struct PlanAgent {
    model: Arc<dyn ChatModel>,
    pub plans: Vec<PlanStep>,
    pub history: Vec<ChatMessage>,
}

impl PlanAgent {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            plans: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Generate the initial plan from the given requirements. Parse failures
    /// yield an empty plan with a canned message, not an error.
    pub async fn generate_initial(
        &mut self,
        requirements: &[Requirement],
    ) -> Result<PlanReply, ModelError> {
        let prompt = prompts::initial_plan(requirements);
        let choices = self
            .model
            .complete(&ChatRequest::json(prompts::PLANNING_SYSTEM, &prompt))
            .await?;

        match first_valid(&choices, parse_plan_reply) {
            Some(reply) => {
                self.plans = reply.plans.clone();
                Ok(reply)
            }
            None => {
                tracing::warn!("no valid completion choice for plan generation");
                self.plans.clear();
                Ok(PlanReply {
                    response: FALLBACK_PLAN_RESPONSE.to_string(),
                    plans: Vec::new(),
                })
            }
        }
    }

    /// Execute one plan step by id. Mirrors transform execution: unknown ids
    /// and parse failures both produce failed outcomes.
    pub async fn execute_step(
        &mut self,
        step_id: &str,
        preview_state: Value,
    ) -> Result<ExecutionOutcome, ModelError> {
        let Some(step) = self.plans.iter_mut().find(|s| s.id == step_id) else {
            return Ok(ExecutionOutcome::failed("Step not found"));
        };

        step.status = WorkStatus::InProgress;
        let prompt = prompts::step_execution(step, &preview_state);

        let choices = self
            .model
            .complete(&ChatRequest::json(prompts::IMPLEMENTATION_SYSTEM, &prompt))
            .await?;

        match first_valid(&choices, parse_outcome) {
            Some(outcome) => Ok(outcome),
            None => {
                tracing::warn!(step_id, "no valid completion choice for step execution");
                Ok(ExecutionOutcome::failed("Error executing step"))
            }
        }
    }

    /// Process one plan chat turn. When the model omits the plan list the
    /// current one is echoed back so the client never loses its state.
    pub async fn process_message(&mut self, message: &str) -> Result<PlanChatReply, ModelError> {
        let prompt = prompts::plan_chat(&self.plans, &self.history, message);
        let choices = self
            .model
            .complete(&ChatRequest::json(prompts::PLANNING_SYSTEM, &prompt))
            .await?;

        match first_valid(&choices, parse_chat_reply) {
            Some(reply) => {
                if let Some(ref plans) = reply.plans {
                    self.plans = plans.clone();
                }
                Ok(reply)
            }
            None => {
                tracing::warn!("no valid completion choice for plan chat turn");
                Ok(PlanChatReply {
                    response: FALLBACK_CHAT_RESPONSE.to_string(),
                    plans: Some(self.plans.clone()),
                    preview: None,
                })
            }
        }
    }
}

fn parse_plan_reply(text: &str) -> Result<PlanReply, ChoiceError> {
    Ok(serde_json::from_str(text)?)
}

fn parse_chat_reply(text: &str) -> Result<PlanChatReply, ChoiceError> {
    Ok(serde_json::from_str(text)?)
}

fn parse_outcome(text: &str) -> Result<ExecutionOutcome, ChoiceError> {
    Ok(serde_json::from_str(text)?)
}
