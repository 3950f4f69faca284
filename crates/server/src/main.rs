mod bootstrap;
mod health;
mod routes;

use anyhow::Result;
use rolodex_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use rolodex_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;

    let router = routes::router(app.pipeline.clone()).merge(health::router(app.store.clone()));

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        bind_address = %address,
        model = %app.config.llm.model,
        "rolodex-server started"
    );

    let grace_secs = app.config.server.graceful_shutdown_secs;
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!(
                event_name = "system.server.stopping",
                grace_secs,
                "shutdown signal received, draining in-flight requests"
            );
        })
        .await?;

    tracing::info!(event_name = "system.server.stopped", "rolodex-server stopped");
    Ok(())
}
