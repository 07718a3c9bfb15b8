// ABOUTME: Defines the Transform struct representing one atomic blueprint step.
// ABOUTME: Transforms are typed by the specialized agent that would execute them.

use serde::{Deserialize, Serialize};

/// Lifecycle status shared by blueprint transforms and plan steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    RolledBack,
}

/// The four specialized transform types. The type determines which kind of
/// artifact the transform produces when executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformType {
    /// Database tables and relationships.
    Schema,
    /// UI components for CRUD operations on schema elements.
    Form,
    /// Detailed views of single instances, possibly spanning tables.
    View,
    /// Aggregate views over many instances.
    Dashboard,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Pending => "pending",
            WorkStatus::InProgress => "in_progress",
            WorkStatus::Completed => "completed",
            WorkStatus::Failed => "failed",
            WorkStatus::RolledBack => "rolled_back",
        }
    }
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TransformType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformType::Schema => "schema",
            TransformType::Form => "form",
            TransformType::View => "view",
            TransformType::Dashboard => "dashboard",
        }
    }
}

impl std::fmt::Display for TransformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic, independently executable blueprint entry. Ids are minted by
/// the model (e.g. `transform-1`) and treated as opaque strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transform {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: WorkStatus,
    pub estimated_time: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub requirement_ids: Vec<String>,
    pub transform_type: TransformType,
}

/// Partial update to a transform from a `modify` change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirement_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform_type: Option<TransformType>,
}
