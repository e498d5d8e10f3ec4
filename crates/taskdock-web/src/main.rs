mod ws;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::response::Html;
use axum::routing::get;
use clap::Parser;

use taskdock::EngineConfig;

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Parser)]
#[command(name = "taskdock-web", about = "browser front-end for the taskdock task client")]
struct Args {
    /// Address to serve the UI on.
    #[arg(long, default_value = "127.0.0.1:8787")]
    listen: SocketAddr,

    /// Base URL of the task backend.
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    backend: String,

    /// Task list refresh period in milliseconds.
    #[arg(long, default_value_t = 3000)]
    poll_ms: u64,

    /// How long transient alerts stay visible, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    alert_ms: u64,
}

pub(crate) struct AppState {
    backend_url: String,
    engine_config: EngineConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdock_web=info".into()),
        )
        .init();

    let args = Args::parse();
    let state = Arc::new(AppState {
        backend_url: args.backend,
        engine_config: EngineConfig {
            poll_period: Duration::from_millis(args.poll_ms),
            alert_duration: Duration::from_millis(args.alert_ms),
        },
    });

    let app = Router::new()
        .route("/", get(index))
        .route("/ws", get(ws::upgrade))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind web listener on {}", args.listen))?;

    tracing::info!("taskdock-web listening on http://{}", args.listen);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
