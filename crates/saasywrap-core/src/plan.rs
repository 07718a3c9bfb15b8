// ABOUTME: Defines the PlanStep struct representing one step of the implementation plan.
// ABOUTME: Plan steps mirror transforms but are typed by implementation layer rather than artifact.

use serde::{Deserialize, Serialize};

use crate::transform::WorkStatus;

/// Which layer of the stack a plan step touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Database,
    Backend,
    Frontend,
    Infrastructure,
}

impl StepType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::Database => "database",
            StepType::Backend => "backend",
            StepType::Frontend => "frontend",
            StepType::Infrastructure => "infrastructure",
        }
    }
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic, independently executable plan step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStep {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: WorkStatus,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub estimated_time: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}
