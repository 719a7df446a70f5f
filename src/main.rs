use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use devconnector_api::{
    app,
    config::{self, AppConfig},
    database::{DatabaseManager, Store},
    AppState,
};

#[derive(Parser, Debug)]
#[command(name = "devconnector-api")]
#[command(about = "Developer social network API server")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides SERVER_PORT/PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Bind address (overrides SERVER_BIND)
    #[arg(long)]
    bind: Option<String>,

    /// Keep all data in memory even if DATABASE_URL is set
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config: AppConfig = config::config().clone();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if args.memory {
        config.database.url = None;
    }
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting DevConnector API in {:?} mode", config.environment);

    let (store, database) = match &config.database.url {
        Some(_) => {
            let manager = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            manager.ensure_schema().await.context("failed to prepare schema")?;
            (Store::postgres(&manager)?, Some(manager))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            (Store::memory(), None)
        }
    };

    let state = AppState::new(&config, store, database.clone())?;
    let router = app(state, &config);

    let bind_addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("DevConnector API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(database) = database {
        database.close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
