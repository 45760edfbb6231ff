#![forbid(unsafe_code)]

//! Feedback daemon: serves the form and appends submissions to a JSON file.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use feedback_core::{FeedbackService, JsonFileStore};
use feedback_daemon::{config::ServerConfig, http};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "feedback-daemon", version, about = "Feedback form service")]
struct Cli {
    /// Listen address, e.g. 127.0.0.1:3000
    #[arg(long, default_value = "127.0.0.1:3000")]
    listen: SocketAddr,

    /// JSON document holding submitted feedback. Must already exist and
    /// contain an array.
    #[arg(long, default_value = "feedbacks.json")]
    store: PathBuf,

    /// Log level (env-filter syntax).
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&cli.log))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = ServerConfig {
        listen: cli.listen,
        store_path: cli.store,
    };
    info!(?config, "starting feedback daemon");

    let store = JsonFileStore::open(&config.store_path)?;
    let svc = Arc::new(FeedbackService::new(Arc::new(store)));

    let app = http::router(svc);

    info!("listening on http://{}", config.listen);
    axum::serve(tokio::net::TcpListener::bind(config.listen).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown requested");
}
