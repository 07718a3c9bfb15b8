// ABOUTME: Prompt templates for the requirements, blueprint, and plan agents.
// ABOUTME: Every template demands a JSON object reply whose shape the caller validates choice by choice.

use serde_json::Value;

use saasywrap_core::chat::{ChatMessage, render_transcript};
use saasywrap_core::{PlanStep, Requirement, Transform};

use crate::dataset::DatasetSummary;

/// System prompt for initial requirements generation.
pub const REQUIREMENTS_ANALYST_SYSTEM: &str = "You are a requirements analysis assistant helping users structure their application requirements. You must respond with valid JSON only, no additional text.";

/// System prompt for requirements chat turns.
pub const REQUIREMENTS_MANAGER_SYSTEM: &str = "You are a requirements management assistant. You must respond with valid JSON only, no additional text.";

/// System prompt for blueprint and plan generation and chat.
pub const PLANNING_SYSTEM: &str =
    "You are a technical planning assistant. You must respond with valid JSON only.";

/// System prompt for transform and plan-step execution.
pub const IMPLEMENTATION_SYSTEM: &str =
    "You are a technical implementation assistant. You must respond with valid JSON only.";

const INITIAL_REQUIREMENTS_GUIDELINES: &str = r#"Generate requirements for the application and provide a natural language response explaining your analysis.
Your response must be a JSON object with two fields:
1. "response": A natural language response that:
   - Acknowledges the user's requirements
   - Explains what you've created
   - Highlights key patterns or themes identified
   - Provides guidance on next steps
   - Asks a follow up question to initiate a dialogue with the user
2. "requirements": An array of requirement objects

Example format:
{
    "response": "I've analyzed your requirements for a project management system. I've broken this down into 8 core requirements, focusing on user management, task tracking, and reporting features. I notice a strong emphasis on team collaboration and data visualization. Take a look at the requirements in the right panel. Let's work together to refine these requirements. What would you like to add next?",
    "requirements": [
        {
            "title": "User Authentication System",
            "description": "Implement secure user authentication with email and password, including password reset functionality",
            "importance": "high",
            "category": "backend",
            "tags": ["security", "user-management", "authentication"]
        },
        {
            "title": "Responsive Dashboard UI",
            "description": "Create a mobile-friendly dashboard that displays key metrics and data visualizations",
            "importance": "medium",
            "category": "frontend",
            "tags": ["ui", "dashboard", "responsive"]
        }
    ]
}

Guidelines for each requirement:
1. title: Brief but specific, action-oriented
2. description: Detailed, testable, and from a user's perspective
3. importance: Must be exactly one of: "high", "medium", "low"
4. category: Must be exactly one of: "frontend", "backend", "database", "feature", "security", "performance", "ux", "other"
5. tags: Array of relevant features, technologies, or themes

IMPORTANT: Your response must be a valid JSON object with both 'response' and 'requirements' fields.
Each requirement must be independent and focused on a single feature or constraint."#;

const REQUIREMENTS_CHAT_FORMAT: &str = r#"You must respond with a JSON object containing two fields:
1. "response": Your natural language response to the user
2. "changes": An array of requirement changes (can be empty if no changes needed)

Example format:
{
    "response": "I understand you want to add user authentication. I'll add that as a requirement.",
    "changes": [
        {
            "type": "add",
            "requirement": {
                "title": "User Authentication",
                "description": "Implement secure login system",
                "importance": "high",
                "category": "backend",
                "tags": ["security", "auth"]
            }
        },
        {
            "type": "modify",
            "id": "existing-id",
            "updates": {
                "importance": "high",
                "category": "backend"
            }
        },
        {
            "type": "remove",
            "id": "requirement-to-remove"
        }
    ]
}

IMPORTANT: Your entire response must be a valid JSON object with these exact fields."#;

const BLUEPRINT_GUIDELINES: &str = r#"Generate a step-by-step blueprint to implement these requirements. Each transform should be atomic and independently executable.

There are four specialized transform types that handle different aspects of the system:
1. schema: Generates database tables and relationships
2. form: Creates UI components (HTML, CSS, Javascript) for CRUD operations on schema elements
3. view: Builds detailed views of single instances that may span multiple database tables
4. dashboard: Produces aggregate views of multiple instances

Your response must be a JSON object with two fields:
1. "response": A natural language response explaining the blueprint
2. "blueprint": An array of transform objects

Example format:
{
    "response": "I've broken down the implementation into 5 transforms, starting with the database schema...",
    "blueprint": [
        {
            "id": "transform-1",
            "title": "Generate User Table Schema",
            "description": "Create the initial database schema for user management",
            "status": "pending",
            "estimated_time": "10 minutes",
            "dependencies": [],
            "requirement_ids": ["req-123", "req-456"],
            "transform_type": "schema"
        }
    ]
}

Each transform must have:
1. id: Unique identifier
2. title: Clear, action-oriented title
3. description: Detailed description of what will be done
4. status: One of: pending, in_progress, completed, failed, rolled_back
5. estimated_time: Estimated time to complete
6. dependencies: Array of transform IDs that must be completed first
7. requirement_ids: Array of requirement IDs that this transform implements
8. transform_type: One of: schema, form, view, dashboard (determines which specialized agent will handle execution)

When assigning requirements to transforms:
- Each requirement should be implemented by at least one transform
- A transform can implement multiple requirements
- Requirements should be grouped logically (e.g., related database tables in one schema transform)
- Form transforms should typically follow schema transforms they depend on
- View transforms can combine data from multiple schemas
- Dashboard transforms typically come last as they often depend on other transforms"#;

const BLUEPRINT_CHAT_FORMAT: &str = r#"You must respond with a JSON object containing two fields:
1. "response": Your natural language response to the user
2. "changes": An array of blueprint changes (can be empty if no changes needed)

Example format:
{
    "response": "I understand you want to add a new transform for user authentication. I'll add that now.",
    "changes": [
        {
            "type": "add",
            "transform": {
                "id": "transform-new",
                "title": "Implement User Authentication",
                "description": "Add secure authentication system",
                "status": "pending",
                "estimated_time": "30 minutes",
                "dependencies": [],
                "requirement_ids": ["req-123"],
                "transform_type": "schema"
            }
        },
        {
            "type": "modify",
            "id": "existing-transform-id",
            "updates": {
                "title": "Updated Title",
                "description": "Updated description",
                "requirement_ids": ["req-123", "req-456"]
            }
        },
        {
            "type": "remove",
            "id": "transform-to-remove"
        }
    ]
}

Each change must be one of:
1. add: Include a complete new transform object
2. modify: Specify transform ID and fields to update
3. remove: Specify transform ID to remove"#;

const PLAN_GUIDELINES: &str = r#"Generate a step-by-step plan to implement these requirements. Each step should be atomic and independently executable.

Your response must be a JSON object with two fields:
1. "response": A natural language response explaining the plan
2. "plans": An array of plan step objects

Example format:
{
    "response": "I've broken down the implementation into 5 steps, starting with the database schema...",
    "plans": [
        {
            "id": "step-1",
            "title": "Generate Database Schema",
            "description": "Create the initial database schema based on the requirements",
            "status": "pending",
            "type": "database",
            "estimated_time": "10 minutes",
            "dependencies": []
        }
    ]
}

Each plan step must have:
1. id: Unique identifier
2. title: Clear, action-oriented title
3. description: Detailed description of what will be done
4. status: One of: pending, in_progress, completed, failed, rolled_back
5. type: One of: database, backend, frontend, infrastructure
6. estimated_time: Estimated time to complete
7. dependencies: Array of step IDs that must be completed first"#;

const EXECUTION_FORMAT: &str = r#"Generate a response with:
1. Updated preview HTML
2. Status of the execution
3. Message to display to the user

Response format:
{
    "preview": "<div>Updated preview HTML</div>",
    "status": "completed",
    "message": "Transform completed successfully",
    "preview_state": {
        "updated": "state"
    }
}"#;

/// Prompt for generating the initial requirements from a free-text
/// description, optionally grounded in an uploaded dataset.
pub fn initial_requirements(description: &str, dataset: Option<&DatasetSummary>) -> String {
    let mut prompt = format!(
        "Given the following description of a SaaS application:\n{}\n\n",
        description
    );
    push_dataset(&mut prompt, "And the following dataset structure:", dataset);
    prompt.push_str(INITIAL_REQUIREMENTS_GUIDELINES);
    prompt
}

/// Prompt for one requirements chat turn.
pub fn requirements_chat(
    history: &[ChatMessage],
    requirements: &[Requirement],
    dataset: Option<&DatasetSummary>,
    message: &str,
) -> String {
    let mut prompt = format!(
        "Given the following conversation about application requirements:\n{}\n\nAnd the current set of requirements:\n{}\n\n",
        render_transcript(history),
        format_requirements(requirements),
    );
    push_dataset(&mut prompt, "And the dataset information:", dataset);
    prompt.push_str(&format!("The user's message: \"{}\"\n\n", message));
    prompt.push_str(REQUIREMENTS_CHAT_FORMAT);
    prompt
}

/// Prompt asking whether a clarifying question would improve the
/// requirements. The model answers with the question, or the literal `NONE`.
pub fn clarifying_question(
    requirements: &[Requirement],
    history: &[ChatMessage],
    dataset: Option<&DatasetSummary>,
) -> String {
    let mut prompt = format!(
        "Given the current requirements:\n{}\n\nAnd the conversation history:\n{}\n\n",
        format_requirements(requirements),
        render_transcript(history),
    );
    push_dataset(&mut prompt, "And the dataset information:", dataset);
    prompt.push_str(
        "Determine if any clarifying questions are needed to improve or complete the requirements.\n\
         If a question is needed, respond with just the question.\n\
         If no questions are needed, respond with 'NONE'.",
    );
    prompt
}

/// Prompt for generating the initial blueprint from requirements.
pub fn initial_blueprint(requirements: &[Requirement]) -> String {
    format!(
        "Given these requirements for a SaaS application:\n{}\n\n{}",
        format_requirements_with_ids(requirements),
        BLUEPRINT_GUIDELINES,
    )
}

/// Prompt for one blueprint chat turn.
pub fn blueprint_chat(
    blueprint: &[Transform],
    requirements: &[Requirement],
    history: &[ChatMessage],
    message: &str,
) -> String {
    let requirements_block = if requirements.is_empty() {
        "No requirements provided".to_string()
    } else {
        format_requirements_with_ids(requirements)
    };

    format!(
        "Given the current blueprint:\n{}\n\nAnd the current requirements:\n{}\n\nAnd the conversation history:\n{}\n\nThe user's message: \"{}\"\n\n{}",
        format_blueprint(blueprint),
        requirements_block,
        render_transcript(history),
        message,
        BLUEPRINT_CHAT_FORMAT,
    )
}

/// Prompt for executing a single blueprint transform.
pub fn transform_execution(
    transform: &Transform,
    requirements: &[Requirement],
    preview_state: &Value,
) -> String {
    let requirement_lines: Vec<String> = transform
        .requirement_ids
        .iter()
        .filter_map(|id| requirements.iter().find(|r| &r.id == id))
        .map(|r| format!("- {} (ID: {}): {}", r.title, r.id, r.description))
        .collect();

    format!(
        "Execute the following transform:\nTitle: {}\nDescription: {}\nTransform Type: {}\nRequirements:\n{}\n\nCurrent preview state:\n{}\n\n{}",
        transform.title,
        transform.description,
        transform.transform_type,
        requirement_lines.join("\n"),
        preview_state,
        EXECUTION_FORMAT,
    )
}

/// Prompt for generating the initial plan from requirements.
pub fn initial_plan(requirements: &[Requirement]) -> String {
    format!(
        "Given these requirements for a SaaS application:\n{}\n\n{}",
        format_requirements_brief(requirements),
        PLAN_GUIDELINES,
    )
}

/// Prompt for one plan chat turn. The model returns the whole updated plan
/// list rather than a change set.
pub fn plan_chat(plans: &[PlanStep], history: &[ChatMessage], message: &str) -> String {
    format!(
        "Given the current plan:\n{}\n\nAnd the conversation history:\n{}\n\nThe user's message: \"{}\"\n\n\
         Generate a response with:\n\
         1. Message to the user\n\
         2. Updated plans (if needed)\n\
         3. Updated preview (if needed)\n\n\
         Response format:\n\
         {{\n    \"response\": \"I understand you want to modify step 2...\",\n    \"plans\": [...],\n    \"preview\": \"<div>Updated preview</div>\"\n}}",
        format_plan(plans),
        render_transcript(history),
        message,
    )
}

/// Prompt for executing a single plan step.
pub fn step_execution(step: &PlanStep, preview_state: &Value) -> String {
    format!(
        "Execute the following plan step:\nTitle: {}\nDescription: {}\nType: {}\n\nCurrent preview state:\n{}\n\n{}",
        step.title, step.description, step.step_type, preview_state, EXECUTION_FORMAT,
    )
}

/// Requirements rendered one per line with their full JSON record, so chat
/// turns can reference any field.
fn format_requirements(requirements: &[Requirement]) -> String {
    requirements
        .iter()
        .map(|req| {
            let json = serde_json::to_string(req).unwrap_or_else(|_| req.title.clone());
            format!("- {}", json)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_requirements_with_ids(requirements: &[Requirement]) -> String {
    requirements
        .iter()
        .map(|req| format!("- {} (ID: {}): {}", req.title, req.id, req.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_requirements_brief(requirements: &[Requirement]) -> String {
    requirements
        .iter()
        .map(|req| format!("- {}: {}", req.title, req.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_blueprint(blueprint: &[Transform]) -> String {
    blueprint
        .iter()
        .enumerate()
        .map(|(i, transform)| {
            format!(
                "Transform {}: {} ({}, Type: {}, Requirements: {})",
                i + 1,
                transform.title,
                transform.status,
                transform.transform_type,
                transform.requirement_ids.join(", "),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_plan(plans: &[PlanStep]) -> String {
    plans
        .iter()
        .enumerate()
        .map(|(i, step)| format!("Step {}: {} ({})", i + 1, step.title, step.status))
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_dataset(prompt: &mut String, heading: &str, dataset: Option<&DatasetSummary>) {
    if let Some(summary) = dataset {
        prompt.push_str(heading);
        prompt.push('\n');
        prompt.push_str(&summary.render());
        prompt.push_str("\n\n");
    }
}
