//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the interrogation middleware
//! - Wire up layers (tracing, timeout, request ID)
//! - Serve on a listener until shutdown
//! - Apply configuration updates by swapping the interrogator

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{middleware, Extension, Json, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::InterrogatorConfig;
use crate::http::middleware::interrogation_middleware;
use crate::http::request::MakeRequestUuidV4;
use crate::observability::metrics;
use crate::parameters::{ParameterError, ParameterMap, RequestInterrogator};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub interrogator: Arc<ArcSwap<RequestInterrogator>>,
}

impl AppState {
    /// Compile `config` and swap it in. The current interrogator is kept on error.
    pub fn apply_config(&self, config: &InterrogatorConfig) -> Result<(), ParameterError> {
        let interrogator = RequestInterrogator::from_config(config)?;
        self.interrogator.store(Arc::new(interrogator));
        Ok(())
    }
}

/// HTTP server exposing the interrogated parameters of each request.
pub struct HttpServer {
    router: Router,
    config: InterrogatorConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server, compiling the interrogator from `config`.
    pub fn new(config: InterrogatorConfig) -> Result<Self, ParameterError> {
        let interrogator = RequestInterrogator::from_config(&config)?;
        let state = AppState {
            interrogator: Arc::new(ArcSwap::from_pointee(interrogator)),
        };

        let router = Self::build_router(&config, state.clone());
        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &InterrogatorConfig, state: AppState) -> Router {
        Router::new()
            .fallback(echo_parameters)
            .layer(middleware::from_fn_with_state(state.clone(), interrogation_middleware))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
            .layer(TraceLayer::new_for_http())
    }

    /// A clone of the router, sharing this server's interrogator.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Shared state, for applying configuration outside `run`.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the startup config.
    pub fn config(&self) -> &InterrogatorConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, applying `config_updates` as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<InterrogatorConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            context = %self.config.context.name,
            "HTTP server starting"
        );

        tokio::spawn(apply_updates(
            self.state.clone(),
            config_updates,
            shutdown.resubscribe(),
        ));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Swap in each config update until the channel closes or shutdown fires.
async fn apply_updates(
    state: AppState,
    mut config_updates: mpsc::UnboundedReceiver<InterrogatorConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = config_updates.recv() => {
                let Some(config) = update else { break };
                match state.apply_config(&config) {
                    Ok(()) => {
                        metrics::record_config_reload(true);
                        tracing::info!(context = %config.context.name, "Configuration reloaded");
                    }
                    Err(e) => {
                        metrics::record_config_reload(false);
                        tracing::error!(error = %e, "Rejected configuration update. Keeping current configuration.");
                    }
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}

/// Echo the request's parameters as a JSON object.
async fn echo_parameters(Extension(params): Extension<ParameterMap>) -> Json<ParameterMap> {
    Json(params)
}
