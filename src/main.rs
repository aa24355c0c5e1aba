#![forbid(unsafe_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

mod cli;
mod config;
mod db;
mod utils;
mod web;

use cli::Cli;
use config::Config;
use web::WebServer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    utils::logging::init_tracing(&config.logging)?;
    info!(version = env!("CARGO_PKG_VERSION"), "items-api starting up");

    let db_manager = Arc::new(
        db::DatabaseManager::new(&config.database)
            .await
            .context("failed to open database")?,
    );
    db_manager.migrate().await.context("failed to migrate database")?;

    let web_server = WebServer::new(Arc::new(config), db_manager);
    web_server.start().await?;

    info!("items-api shut down");
    Ok(())
}
