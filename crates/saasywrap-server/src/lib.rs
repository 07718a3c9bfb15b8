// ABOUTME: HTTP server for saasywrap, forwarding request bodies to the chat agents.
// ABOUTME: Uses Axum with shared state; the server itself is stateless between requests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use config::ServerConfig;
pub use routes::create_router;
