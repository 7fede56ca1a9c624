//! Prometheus metrics recording.
//!
//! Lookup requests are counted and timed per route template, so the label
//! set stays bounded no matter which prefixes callers send.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use placenames_core::IndexStats;
use tracing::warn;

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the process-wide Prometheus recorder and returns its handle.
///
/// Only the first call installs; later calls return the same handle, so
/// every router built in one process renders the same registry.
pub fn install_recorder() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if metrics::set_global_recorder(recorder).is_err() {
                warn!("a metrics recorder was already installed; /metrics will be empty");
            }
            handle
        })
        .clone()
}

/// Records HTTP request metrics.
pub fn record_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Records the number of suggestions one lookup returned.
pub fn record_lookup(results: usize) {
    histogram!("placenames_lookup_results").record(results as f64);
}

/// Publishes the size of the loaded index.
pub fn record_index(stats: &IndexStats) {
    gauge!("placenames_index_entries").set(stats.num_entries as f64);
    gauge!("placenames_index_nodes").set(stats.num_nodes as f64);
}
