mod config;

use std::net::SocketAddr;

use anyhow::{Context, bail};
use axum::http::{
    HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use clap::{Parser, Subcommand};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use murmur_api::AppStateInner;
use murmur_db::{CommentStore, Database, MemoryStore};

use crate::config::{Config, StoreKind};

#[derive(Parser)]
#[command(name = "murmur", version, about = "Comment board backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Insert the demo users and comments into the database
    Seed,
    /// Delete the newest user and rewind the user id sequence
    RemoveLatestUser,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "murmur=debug,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Seed => {
            let db = open_database(&config)?;
            let report = db.seed()?;
            info!(
                "Seed complete: {} users, {} comments inserted",
                report.users, report.comments
            );
            Ok(())
        }
        Command::RemoveLatestUser => {
            let db = open_database(&config)?;
            match db.remove_latest_user()? {
                Some(user) => info!("Removed user {} ({})", user.id, user.name),
                None => info!("No users found in the database"),
            }
            Ok(())
        }
    }
}

fn open_database(config: &Config) -> anyhow::Result<Database> {
    if config.store == StoreKind::Memory {
        bail!("maintenance commands need MURMUR_STORE=sqlite; the memory store does not persist");
    }
    Database::open(&config.db_path)
        .with_context(|| format!("opening database at {}", config.db_path.display()))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let store: Box<dyn CommentStore> = match config.store {
        StoreKind::Sqlite => Box::new(open_database(&config)?),
        StoreKind::Memory => {
            info!("Using in-memory store; data is lost on exit");
            Box::new(MemoryStore::seeded())
        }
    };

    let state = AppStateInner::new(store, config.current_user_id);

    let origin = HeaderValue::from_str(&config.allowed_origin)
        .with_context(|| format!("invalid MURMUR_ALLOWED_ORIGIN '{}'", config.allowed_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let app = murmur_api::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Murmur listening on {}", addr);
    info!("CORS origin: {}", config.allowed_origin);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
