// ABOUTME: Core library for saasywrap, containing the requirement, transform, and plan domain types.
// ABOUTME: This crate defines the shared data model used across all saasywrap components.

pub mod changes;
pub mod chat;
pub mod plan;
pub mod requirement;
pub mod transform;

pub use changes::{RequirementChange, TransformChange, apply_requirement_changes};
pub use chat::ChatMessage;
pub use plan::{PlanStep, StepType};
pub use requirement::{Importance, Requirement, RequirementDraft, RequirementUpdate};
pub use transform::{Transform, TransformType, WorkStatus};
