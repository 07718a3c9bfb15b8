// ABOUTME: Chat message type and transcript rendering shared by all agents.
// ABOUTME: Conversations round-trip through the client, so messages are plain serde structs.

use serde::{Deserialize, Serialize};

/// One message in a conversation. Roles are the strings the web client sends
/// ("user", "assistant"); they are only ever rendered back into prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/// Render a conversation as `Role: content` lines for prompt inclusion,
/// with the role capitalized.
pub fn render_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|msg| format!("{}: {}", capitalize(&msg.role), msg.content))
        .collect::<Vec<_>>()
        .join("\n")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
