// ABOUTME: The requirements agent: turns a product description into structured requirements
// ABOUTME: and refines them through chat by applying model-proposed change sets.

use std::sync::Arc;

use serde::Deserialize;

use saasywrap_core::chat::ChatMessage;
use saasywrap_core::{Requirement, RequirementChange, RequirementDraft, apply_requirement_changes};

use crate::choices::{ChoiceError, first_valid};
use crate::client::{ChatModel, ChatRequest, ModelError};
use crate::dataset::DatasetSummary;
use crate::prompts;

/// Actor name stamped on model-created requirements.
const AGENT_ACTOR: &str = "ai-agent";

const FALLBACK_INITIAL_RESPONSE: &str = "I've analyzed your requirements and created structured requirements based on them. You can view them in the panel on the right.";

const FALLBACK_CHAT_RESPONSE: &str =
    "I apologize, but I'm having trouble processing your request. Could you please rephrase it?";

#[derive(Debug, Deserialize)]
struct InitialReply {
    response: String,
    requirements: Vec<RequirementDraft>,
}

// Unlike the blueprint chat reply, `changes` is mandatory here: a choice
// without it is rejected and the scan moves on.
#[derive(Debug, Deserialize)]
struct ChatReply {
    response: String,
    changes: Vec<RequirementChange>,
}

/// Conversational agent that maintains the requirements list. The server is
/// stateless, so every field that survives across HTTP requests is public
/// and restored from the request body.
pub struct RequirementsAgent {
    model: Arc<dyn ChatModel>,
    choice_count: u8,
    pub requirements: Vec<Requirement>,
    pub history: Vec<ChatMessage>,
    pub dataset: Option<DatasetSummary>,
    pub initial_description: String,
    initial_response: Option<String>,
}

impl RequirementsAgent {
    /// Create a fresh agent. `choice_count` is how many completions each
    /// JSON call requests; the first valid one wins.
    pub fn new(model: Arc<dyn ChatModel>, choice_count: u8) -> Self {
        Self {
            model,
            choice_count,
            requirements: Vec::new(),
            history: Vec::new(),
            dataset: None,
            initial_description: String::new(),
            initial_response: None,
        }
    }

    /// The natural-language reply stored by the last successful
    /// `generate_initial` call, or a canned acknowledgement.
    pub fn initial_response(&self) -> &str {
        self.initial_response
            .as_deref()
            .unwrap_or(FALLBACK_INITIAL_RESPONSE)
    }

    /// Generate the initial requirements from a free-text description.
    /// When every completion choice is rejected the list comes back empty
    /// rather than failing the request.
    pub async fn generate_initial(
        &mut self,
        description: &str,
    ) -> Result<&[Requirement], ModelError> {
        self.initial_description = description.to_string();

        let prompt = prompts::initial_requirements(description, self.dataset.as_ref());
        let request = ChatRequest::json(prompts::REQUIREMENTS_ANALYST_SYSTEM, &prompt)
            .with_choices(self.choice_count);
        let choices = self.model.complete(&request).await?;

        match first_valid(&choices, parse_initial_reply) {
            Some(reply) => {
                self.requirements = reply
                    .requirements
                    .into_iter()
                    .map(|draft| {
                        Requirement::from_draft(
                            draft,
                            AGENT_ACTOR,
                            "Requirement generated from initial description",
                        )
                    })
                    .collect();
                self.initial_response = Some(reply.response);
            }
            None => {
                tracing::warn!("no valid completion choice for initial requirements");
                self.requirements.clear();
            }
        }

        Ok(&self.requirements)
    }

    /// Process one chat turn: ask the model for a response plus a change
    /// set, apply the changes to the in-memory list, and return the
    /// response text. Exhausted choices yield a canned apology.
    pub async fn process_message(&mut self, message: &str) -> Result<String, ModelError> {
        let prompt = prompts::requirements_chat(
            &self.history,
            &self.requirements,
            self.dataset.as_ref(),
            message,
        );
        let request = ChatRequest::json(prompts::REQUIREMENTS_MANAGER_SYSTEM, &prompt)
            .with_choices(self.choice_count);
        let choices = self.model.complete(&request).await?;

        match first_valid(&choices, parse_chat_reply) {
            Some(reply) => {
                apply_requirement_changes(&mut self.requirements, reply.changes, AGENT_ACTOR);
                Ok(reply.response)
            }
            None => {
                tracing::warn!("no valid completion choice for requirements chat turn");
                Ok(FALLBACK_CHAT_RESPONSE.to_string())
            }
        }
    }

    /// Ask whether a clarifying question would improve the requirements.
    /// Returns `None` when the model answers with the `NONE` sentinel.
    pub async fn next_question(&self) -> Result<Option<String>, ModelError> {
        let prompt =
            prompts::clarifying_question(&self.requirements, &self.history, self.dataset.as_ref());
        let choices = self.model.complete(&ChatRequest::text(&prompt)).await?;

        let question = choices
            .first()
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if question == "NONE" || question.is_empty() {
            Ok(None)
        } else {
            Ok(Some(question))
        }
    }
}

fn parse_initial_reply(text: &str) -> Result<InitialReply, ChoiceError> {
    let reply: InitialReply = serde_json::from_str(text)?;
    if reply.requirements.is_empty() {
        return Err(ChoiceError::Invalid("requirements array is empty".to_string()));
    }
    Ok(reply)
}

fn parse_chat_reply(text: &str) -> Result<ChatReply, ChoiceError> {
    Ok(serde_json::from_str(text)?)
}
