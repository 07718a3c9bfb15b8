// ABOUTME: Configuration loading and validation for the saasywrap server.
// ABOUTME: Reads SAASYWRAP_* environment variables with defaults matching the hosted deployment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_BIND: &str = "127.0.0.1:5000";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
const DEFAULT_CHOICE_COUNT: u8 = 3;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SAASYWRAP_BIND is not a valid socket address: {0}")]
    InvalidBind(String),

    #[error("{var} is not a valid number: {value}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub choice_count: u8,
}

impl ServerConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - SAASYWRAP_BIND: socket address to bind (default: 127.0.0.1:5000)
    /// - SAASYWRAP_UPLOAD_DIR: where uploaded datasets land (default: uploads)
    /// - SAASYWRAP_MAX_UPLOAD_BYTES: request body cap (default: 16 MiB)
    /// - SAASYWRAP_CHOICES: completions requested per JSON call (default: 3)
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_str =
            std::env::var("SAASYWRAP_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        let upload_dir = std::env::var("SAASYWRAP_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let max_upload_bytes = match std::env::var("SAASYWRAP_MAX_UPLOAD_BYTES") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                var: "SAASYWRAP_MAX_UPLOAD_BYTES",
                value,
            })?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let choice_count = match std::env::var("SAASYWRAP_CHOICES") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
                var: "SAASYWRAP_CHOICES",
                value,
            })?,
            Err(_) => DEFAULT_CHOICE_COUNT,
        };

        Ok(Self {
            bind,
            upload_dir,
            max_upload_bytes,
            choice_count,
        })
    }
}
