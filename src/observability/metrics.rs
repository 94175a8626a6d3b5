//! Metrics collection and exposition.
//!
//! # Metrics
//! - `interrogations_total` (counter): interrogated requests by outcome
//! - `interrogation_parameters` (histogram): parameters produced per request
//! - `config_reloads_total` (counter): configuration reloads by outcome

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one interrogated request.
pub fn record_interrogation(outcome: &'static str, parameters: usize) {
    ::metrics::counter!("interrogations_total", "outcome" => outcome).increment(1);
    if parameters > 0 {
        ::metrics::histogram!("interrogation_parameters").record(parameters as f64);
    }
}

/// Record a configuration reload attempt.
pub fn record_config_reload(success: bool) {
    let outcome = if success { "applied" } else { "rejected" };
    ::metrics::counter!("config_reloads_total", "outcome" => outcome).increment(1);
}
