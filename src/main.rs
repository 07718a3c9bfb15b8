// ABOUTME: Entry point for the saasywrap binary.
// ABOUTME: Parses CLI arguments, initializes tracing, and starts the HTTP server.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use saasywrap_agent::{ChatModel, OpenAiModel};
use saasywrap_server::{AppState, ServerConfig, create_router};

#[derive(Parser)]
#[command(author, version, about = "saasywrap - conversational SaaS requirements assistant")]
struct Args {
    /// Socket address to bind, overriding SAASYWRAP_BIND
    #[arg(short, long)]
    bind: Option<std::net::SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "saasywrap=debug,tower_http=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let mut config = ServerConfig::from_env().context("loading server configuration")?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    let model = OpenAiModel::from_env().context("configuring the model client")?;
    tracing::info!(model = model.model_name(), "using OpenAI-compatible model");

    std::fs::create_dir_all(&config.upload_dir)
        .with_context(|| format!("creating upload directory {}", config.upload_dir.display()))?;

    let state = Arc::new(AppState::new(
        Arc::new(model),
        config.upload_dir.clone(),
        config.choice_count,
        config.max_upload_bytes,
    ));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!("saasywrap listening on {}", config.bind);

    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}
