// ABOUTME: Shared application state for the saasywrap HTTP server.
// ABOUTME: Holds the chat-model handle and upload settings; conversations round-trip through clients.

use std::path::PathBuf;
use std::sync::Arc;

use saasywrap_agent::ChatModel;

/// Shared application state accessible by all Axum handlers. Agents are
/// constructed per request from the model handle, so nothing here mutates
/// after startup.
pub struct AppState {
    pub model: Arc<dyn ChatModel>,
    pub upload_dir: PathBuf,
    pub choice_count: u8,
    pub max_upload_bytes: usize,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        model: Arc<dyn ChatModel>,
        upload_dir: PathBuf,
        choice_count: u8,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            model,
            upload_dir,
            choice_count,
            max_upload_bytes,
        }
    }
}
