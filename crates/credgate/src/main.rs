//! credgate - account registration, login and token-gated access

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, LoggingConfig};
use credgate_api::{AppState, create_router};
use credgate_auth::{AccessGate, AuthService, JwtManager, PasswordService};
use credgate_db::{CredentialStore, Database, MemoryStore};

/// credgate - minimal credential management endpoint
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "CREDGATE_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "CREDGATE_PORT")]
    port: Option<u16>,

    /// Token signing secret (overrides auth.jwt_secret)
    #[arg(long, env = "CREDGATE_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(secret) = args.jwt_secret {
        config.auth.jwt_secret = secret;
    }

    init_logging(&config.logging);

    info!("Starting credgate v{}", env!("CARGO_PKG_VERSION"));

    config.validate()?;
    config.ensure_jwt_secret();

    let metrics_handle = if config.metrics.enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install metrics recorder")?;
        Some(Arc::new(handle))
    } else {
        None
    };

    let store = open_store(&config).await?;
    info!("Credential store holds {} users", store.count().await?);

    // The signing secret is fixed for the lifetime of the process
    let jwt = Arc::new(JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_hours,
    ));
    let passwords = PasswordService::new(config.auth.argon2)?;
    let auth = AuthService::new(store, jwt.clone(), passwords)?;
    let gate = AccessGate::new(jwt);

    let state = AppState::new(auth, gate);

    let app = create_router(state, metrics_handle).layer(TraceLayer::new_for_http());

    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port)
        .parse()
        .with_context(|| format!("Invalid bind address: {}:{}", bind_addr, port))?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Open the configured credential store
async fn open_store(config: &Config) -> Result<Arc<dyn CredentialStore>> {
    match config.database.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        _ => {
            if let Some(parent) = Path::new(&config.database.path).parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let db_url = format!("sqlite:{}?mode=rwc", config.database.path);
            let db = Database::new(&db_url)
                .await
                .with_context(|| format!("Failed to open database at {}", config.database.path))?;
            Ok(Arc::new(db))
        }
    }
}

/// Initialize logging
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
