//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cms_router_resolutions_total` (counter): routing outcomes by `outcome`
//! - `cms_router_request_duration_seconds` (histogram): routing + render latency
//! - `cms_router_not_modified_total` (counter): 304 answers from cache negotiation
//! - `cms_router_sitemap_urls` (gauge): entries in the last generated sitemap
//! - `cms_router_routing_errors_total` (counter): store failures during routing

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_resolution(outcome: &'static str, start: Instant) {
    metrics::counter!("cms_router_resolutions_total", "outcome" => outcome).increment(1);
    metrics::histogram!("cms_router_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_routing_error() {
    metrics::counter!("cms_router_routing_errors_total").increment(1);
}

pub fn record_not_modified() {
    metrics::counter!("cms_router_not_modified_total").increment(1);
}

pub fn record_sitemap(urls: usize) {
    metrics::gauge!("cms_router_sitemap_urls").set(urls as f64);
}
