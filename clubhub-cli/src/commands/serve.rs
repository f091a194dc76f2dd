//! HTTP server command
//!
//! Runs the club API with either the MongoDB store (default) or an
//! in-memory store for local demos.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use clubhub_server::{run_server, AppState, DatabaseConfig, MemoryStore, MongoStore, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "CLUBHUB_BIND", default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Extra allowed CORS origin (repeatable)
    #[arg(long = "allow-origin", env = "CLUBHUB_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// MongoDB connection string
    #[arg(long, env = "MONGODB_URI")]
    pub mongodb_uri: Option<String>,

    /// Database name
    #[arg(long, env = "MONGODB_DATABASE")]
    pub database: Option<String>,

    /// Keep everything in memory instead of MongoDB (data is lost on exit).
    /// MongoDB settings are ignored when set.
    #[arg(long)]
    pub memory: bool,
}

impl ServeArgs {
    fn database_config(&self) -> DatabaseConfig {
        let defaults = DatabaseConfig::default();
        DatabaseConfig {
            uri: self.mongodb_uri.clone().unwrap_or(defaults.uri),
            database: self.database.clone().unwrap_or(defaults.database),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        allowed_origins: args.allowed_origins.clone(),
    };

    let state = if args.memory {
        tracing::warn!("Using in-memory store; data will not persist");
        AppState::new(MemoryStore::new())
    } else {
        let db = args.database_config();
        // Connection is made by the first request, not here
        tracing::info!(database = %db.database, "Using MongoDB store");
        AppState::new(MongoStore::new(db))
    };

    tracing::info!("Starting clubhub server on {}", args.bind);

    run_server(state, config).await.context("Server error")?;

    Ok(())
}
