// ABOUTME: AlterFit server binary entrypoint
// ABOUTME: Loads configuration, connects the database, and serves the REST API

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 AlterFit

use alterfit_server::{
    auth::AuthManager,
    config::ServerConfig,
    database::Database,
    progression,
    server::{self, ServerResources},
};
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "alterfit-server")]
#[command(about = "AlterFit fitness coaching server")]
struct Args {
    /// HTTP port (overrides ALTERFIT_HTTP_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Database URL (overrides ALTERFIT_DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    // Fail fast on a malformed rank table rather than serving bad progression data
    progression::validate_rank_table()?;

    info!(database_url = %config.database_url, "Connecting to database");
    let database = Database::new(&config.database_url).await?;

    let auth_manager = AuthManager::new(
        config.jwt_secret.clone().into_bytes(),
        config.token_expiry_hours,
        config.bcrypt_cost,
    );

    let resources = Arc::new(ServerResources::new(database, auth_manager, config));
    server::run(resources).await?;
    Ok(())
}
