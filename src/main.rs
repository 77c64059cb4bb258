//! Server entry point.

use std::sync::Arc;

use anyhow::Context;
use poem::{Server, listener::TcpListener};
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::EnvFilter;
use yatube_api::config::Config;
use yatube_api::migration::Migrator;
use yatube_api::{AppState, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let mut options = ConnectOptions::new(config.database_url.clone());
    options.sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .context("connecting to the database")?;

    if config.run_migrations {
        Migrator::up(&db, None).await.context("applying migrations")?;
        tracing::info!("migrations applied");
    }

    tokio::fs::create_dir_all(&config.media_root)
        .await
        .with_context(|| format!("creating media root {}", config.media_root.display()))?;

    let state = Arc::new(AppState::from_config(db, &config));
    let app = build_app(state);

    tracing::info!(addr = %config.bind_addr, "starting server");
    Server::new(TcpListener::bind(config.bind_addr.clone()))
        .run(app)
        .await?;
    Ok(())
}
