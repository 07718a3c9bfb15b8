// ABOUTME: Agent system for saasywrap, driving LLM-assisted requirements and planning.
// ABOUTME: Defines the chat-model client abstraction and the three agent classes built on it.

pub mod blueprint;
pub mod choices;
pub mod client;
pub mod dataset;
pub mod plan;
pub mod prompts;
pub mod requirements;
pub mod testing;

pub use blueprint::{BlueprintAgent, BlueprintChatReply, BlueprintReply, ExecutionOutcome};
pub use client::{ChatModel, ChatRequest, ModelError, OpenAiModel};
pub use dataset::{DatasetError, DatasetSummary};
pub use plan::{PlanAgent, PlanChatReply, PlanReply};
pub use requirements::RequirementsAgent;
pub use testing::StubModel;
