// ABOUTME: Tagged change-set enums produced by chat replies, plus in-place application.
// ABOUTME: Requirement changes are applied server-side; transform changes are returned to the client.

use serde::{Deserialize, Serialize};

use crate::requirement::{Requirement, RequirementDraft, RequirementUpdate};
use crate::transform::{Transform, TransformUpdate};

/// A single mutation to the requirements list, as produced by the model
/// during a requirements chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RequirementChange {
    Add { requirement: RequirementDraft },
    Modify { id: String, updates: RequirementUpdate },
    Remove { id: String },
}

/// A single mutation to the blueprint, as produced by the model during a
/// blueprint chat turn. These are validated here but applied by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransformChange {
    Add { transform: Transform },
    Modify { id: String, updates: TransformUpdate },
    Remove { id: String },
}

/// Apply requirement changes in order. Adds are stamped with fresh ids and
/// attributed to `actor`; modify/remove with ids not present in the list are
/// logged and skipped rather than failing the whole batch.
pub fn apply_requirement_changes(
    requirements: &mut Vec<Requirement>,
    changes: Vec<RequirementChange>,
    actor: &str,
) {
    for change in changes {
        match change {
            RequirementChange::Add { requirement } => {
                requirements.push(Requirement::from_draft(
                    requirement,
                    actor,
                    "Requirement added during conversation",
                ));
            }
            RequirementChange::Modify { id, updates } => {
                match requirements.iter_mut().find(|r| r.id == id) {
                    Some(req) => req.apply_update(
                        updates,
                        actor,
                        "Multiple fields updated during conversation",
                    ),
                    None => {
                        tracing::warn!(id = %id, "modify targets unknown requirement, skipping");
                    }
                }
            }
            RequirementChange::Remove { id } => {
                let before = requirements.len();
                requirements.retain(|r| r.id != id);
                if requirements.len() == before {
                    tracing::warn!(id = %id, "remove targets unknown requirement, skipping");
                }
            }
        }
    }
}
