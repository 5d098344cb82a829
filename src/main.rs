// src/main.rs
//! SocialPlace API server entry point
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use socialplace_api::api::{ApiServer, AppState};
use socialplace_api::auth::{MemorySessionStore, RedisSessionStore, SessionStore};
use socialplace_api::config::AppConfig;
use socialplace_api::storage::{DocumentStore, MemoryDocumentStore, SqliteDocumentStore};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "socialplace")]
#[command(about = "SocialPlace API Server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Address to bind (overrides SOCIALPLACE_API_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides SOCIALPLACE_API_PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Use in-process stores instead of SQLite and Redis
        #[arg(long)]
        in_memory: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // .env is optional

    let args = Args::parse();

    init_logging()?;

    info!("Starting SocialPlace API v{}", env!("CARGO_PKG_VERSION"));

    let mut config = AppConfig::from_env().context("invalid configuration")?;

    let in_memory = match args.command {
        Some(Commands::Serve {
            host,
            port,
            in_memory,
        }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            in_memory
        }
        None => false,
    };

    let (documents, sessions) = if in_memory {
        warn!("using in-memory stores; data is lost on exit");
        let documents: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        (documents, sessions)
    } else {
        let documents: Arc<dyn DocumentStore> = Arc::new(
            SqliteDocumentStore::connect(&config.database_url, config.store_timeout)
                .await
                .context("document store")?,
        );
        info!(
            "Redis session store at {}:{} db {}",
            config.redis.host, config.redis.port, config.redis.db
        );
        let sessions: Arc<dyn SessionStore> = Arc::new(
            RedisSessionStore::connect(&config.redis.url(), config.store_timeout)
                .await
                .context("session store")?,
        );
        (documents, sessions)
    };

    let state = AppState::new(documents, sessions, &config.auth)?;
    let server = ApiServer::new(
        state,
        config.host.clone(),
        config.port,
        config.cors_allow_origin.clone(),
    );
    server.start().await?;

    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
