#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use args::{Args, Command};
use bulwark_config::Config;
use bulwark_db::{DataStore, PgStore};
use bulwark_server::{Collaborators, Server};
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;
    if let Some(listen) = args.listen {
        config.server.listen_address = Some(listen);
    }

    // Initialize telemetry
    bulwark_telemetry::init(&config.logging, config.environment)?;

    tracing::info!(
        config_path = %args.config.display(),
        environment = ?config.environment,
        "starting bulwark"
    );

    let result = match args.command() {
        Command::Serve => serve(config).await,
        Command::Migrate { dir } => migrate(&config, &dir).await,
    };

    if let Err(ref e) = result {
        tracing::error!(error = ?e, "bulwark failed");
    }

    result
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let store = match &config.database {
        Some(database) => {
            let store = PgStore::connect(database);
            store
                .assert_connection()
                .await
                .context("database connection check failed")?;
            Some(Arc::new(store) as Arc<dyn DataStore>)
        }
        None => {
            tracing::warn!("no [database] section configured; running without a data store");
            None
        }
    };

    // Build server
    let collaborators = Collaborators::from_config(&config, store);
    let server = Server::new(&config, collaborators)?;

    // Set up graceful shutdown
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    // Run server
    server.serve(shutdown).await?;

    tracing::info!("bulwark stopped");
    Ok(())
}

async fn migrate(config: &Config, dir: &Path) -> anyhow::Result<()> {
    let database = config
        .database
        .as_ref()
        .context("migrations need a [database] section")?;

    let store = PgStore::connect(database);
    store
        .assert_connection()
        .await
        .context("database connection check failed")?;

    let applied = bulwark_db::run_migrations(&store, dir).await?;
    tracing::info!(count = applied.len(), "migrations complete");

    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
