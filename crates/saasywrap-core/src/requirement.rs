// ABOUTME: Defines the Requirement struct and its importance/category vocabulary.
// ABOUTME: Requirements carry change history and camelCase wire names for the web client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Importance levels a requirement can have. Strictly enforced: a draft with
/// any other value fails deserialization and the containing model choice is
/// skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

/// Categories suggested to the model. Unlike importance these are not
/// enforced; a requirement with a category outside this set is accepted
/// with a warning.
pub const SUGGESTED_CATEGORIES: [&str; 8] = [
    "frontend",
    "backend",
    "database",
    "feature",
    "security",
    "performance",
    "ux",
    "other",
];

/// Whether a category is one of the suggested values.
pub fn is_suggested_category(category: &str) -> bool {
    SUGGESTED_CATEGORIES.contains(&category)
}

/// A single entry in a requirement's change history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub details: String,
}

/// What a change-history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Modified,
}

/// A structured requirement as held in memory and sent to the web client.
/// Field names are camelCase on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub importance: Importance,
    pub category: String,
    pub tags: Vec<String>,
    pub date_added: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
    pub created_by: String,
    pub change_history: Vec<ChangeRecord>,
}

/// The shape the model is asked to produce for a new requirement. Stamping a
/// draft into a full [`Requirement`] assigns the id, timestamps, and the
/// initial history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementDraft {
    pub title: String,
    pub description: String,
    pub importance: Importance,
    pub category: String,
    pub tags: Vec<String>,
}

/// Partial update to an existing requirement, as produced by a `modify`
/// change. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Requirement {
    /// Stamp a draft into a full requirement: fresh `req-` id, timestamps set
    /// to now, and a `created` history entry attributed to `created_by`.
    pub fn from_draft(draft: RequirementDraft, created_by: &str, details: &str) -> Self {
        if !is_suggested_category(&draft.category) {
            tracing::warn!(category = %draft.category, "using non-standard requirement category");
        }
        let now = Utc::now();
        Self {
            id: format!("req-{}", Ulid::new()),
            title: draft.title,
            description: draft.description,
            importance: draft.importance,
            category: draft.category,
            tags: draft.tags,
            date_added: now,
            date_modified: now,
            created_by: created_by.to_string(),
            change_history: vec![ChangeRecord {
                kind: ChangeKind::Created,
                timestamp: now,
                user_id: created_by.to_string(),
                details: details.to_string(),
            }],
        }
    }

    /// Apply a partial update, bump the modified timestamp, and append a
    /// `modified` history entry attributed to `updated_by`.
    pub fn apply_update(&mut self, updates: RequirementUpdate, updated_by: &str, details: &str) {
        if let Some(title) = updates.title {
            self.title = title;
        }
        if let Some(description) = updates.description {
            self.description = description;
        }
        if let Some(importance) = updates.importance {
            self.importance = importance;
        }
        if let Some(category) = updates.category {
            if !is_suggested_category(&category) {
                tracing::warn!(category = %category, "using non-standard requirement category");
            }
            self.category = category;
        }
        if let Some(tags) = updates.tags {
            self.tags = tags;
        }
        let now = Utc::now();
        self.date_modified = now;
        self.change_history.push(ChangeRecord {
            kind: ChangeKind::Modified,
            timestamp: now,
            user_id: updated_by.to_string(),
            details: details.to_string(),
        });
    }
}
