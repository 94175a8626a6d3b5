//! Request interrogation service.
//!
//! Serves every path by echoing the interrogated parameters of the request
//! as a JSON object. Configuration is read from the TOML file named by
//! `INTERROGATOR_CONFIG` (default `interrogator.toml`) and reloaded on change.

use std::path::PathBuf;

use tokio::net::TcpListener;

use request_interrogator::config::loader::load_config;
use request_interrogator::config::watcher::ConfigWatcher;
use request_interrogator::lifecycle::signals::shutdown_signal;
use request_interrogator::observability::{logging, metrics};
use request_interrogator::{HttpServer, Shutdown};

const CONFIG_ENV: &str = "INTERROGATOR_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "interrogator.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = load_config(&config_path)?;
    logging::init_tracing(&config.observability.log_level);

    tracing::info!(
        path = %config_path.display(),
        bind_address = %config.listener.bind_address,
        context = %config.context.name,
        url_rules = config.parameters.urls.len(),
        query_mappings = config.parameters.query.len(),
        cdn_templates = config.cdn.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address already validated by the loader.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let (watcher, config_updates) = ConfigWatcher::new(&config_path);
    // Dropping the watcher stops reloads, so keep it for the life of main.
    let _watcher = match watcher.run() {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "Config watcher unavailable; hot reload disabled");
            None
        }
    };

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_task = tokio::spawn(server.run(listener, config_updates, shutdown.subscribe()));

    shutdown_signal().await;
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
