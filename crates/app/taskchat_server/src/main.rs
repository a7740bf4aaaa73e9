//! Taskchat API server binary.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use taskchat_api::config::{ApiConfig, default_hash_concurrency};
use taskchat_core::auth::jwt::{DEFAULT_TOKEN_TTL_SECS, resolve_jwt_secret};
use taskchat_core::auth::password::DEFAULT_BCRYPT_COST;
use taskchat_core::store::{MemoryStore, PgStore, Store};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "taskchat_server", about = "Taskchat API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/taskchat"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Keep all data in process memory instead of PostgreSQL (lost on exit).
    #[arg(long, default_value_t = false)]
    in_memory: bool,

    /// Session token lifetime in seconds.
    #[arg(long, env = "TOKEN_TTL_SECS", default_value_t = DEFAULT_TOKEN_TTL_SECS)]
    token_ttl_secs: i64,

    /// bcrypt cost factor for new password digests.
    #[arg(long, env = "BCRYPT_COST", default_value_t = DEFAULT_BCRYPT_COST)]
    bcrypt_cost: u32,

    /// Maximum concurrent bcrypt operations (default: available parallelism).
    #[arg(long, env = "HASH_CONCURRENCY")]
    hash_concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,taskchat_api=debug,taskchat_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    info!(bind_addr = %args.bind_addr, in_memory = args.in_memory, "starting taskchat_server");

    let store: Arc<dyn Store> = if args.in_memory {
        warn!("using in-memory store; data will not survive a restart");
        Arc::new(MemoryStore::new())
    } else {
        info!(max_connections = args.max_connections, "configuring connection pool");
        let pool = PgPoolOptions::new()
            .max_connections(args.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(&args.database_url)
            .await?;

        info!("running database migrations");
        taskchat_core::migrate::migrate(&pool).await?;
        Arc::new(PgStore::new(pool))
    };

    let config = ApiConfig {
        bind_addr: args.bind_addr,
        jwt_secret: resolve_jwt_secret(),
        token_ttl_secs: args.token_ttl_secs,
        bcrypt_cost: args.bcrypt_cost,
        hash_concurrency: args.hash_concurrency.unwrap_or_else(default_hash_concurrency),
    };
    info!(
        token_ttl_secs = config.token_ttl_secs,
        bcrypt_cost = config.bcrypt_cost,
        hash_concurrency = config.hash_concurrency,
        "auth settings"
    );

    let state = taskchat_api::AppState::new(store, config.clone())?;
    let app = taskchat_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("received Ctrl-C, shutting down");
            }
            shutdown.cancel();
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}
