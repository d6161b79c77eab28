pub mod analysis;
pub mod analytics;
pub mod api;
pub mod auth;
pub mod bmi;
pub mod config;
pub mod core_state;
pub mod db;
pub mod knowledge;
pub mod models;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::core_state::{CoreState, StartupError};

pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(serve()) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn serve() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;
    let core = Arc::new(CoreState::from_config(&config)?);

    let mut server = api::start_api_server(core, config.bind_addr).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    server.shutdown();
    server.stopped().await
}
