//! Pipeline counters and the optional Prometheus exporter.

use std::net::SocketAddr;

use tracing::{info, warn};

/// Installs the Prometheus exporter when `PROMETHEUS_ADDR` is set.
/// Metrics still record (as no-ops) when the exporter is absent, so
/// callers never need to guard.
pub fn init_metrics() {
    let Ok(addr) = std::env::var("PROMETHEUS_ADDR") else {
        return;
    };
    let sock_addr: SocketAddr = match addr.parse() {
        Ok(a) => a,
        Err(e) => {
            warn!("Invalid PROMETHEUS_ADDR '{}': {}", addr, e);
            return;
        }
    };
    let builder =
        metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(sock_addr);
    match builder.install() {
        Ok(()) => {
            info!("Prometheus exporter listening on http://{}/metrics", addr);
            PipelineMetrics::register_metrics();
        }
        Err(e) => {
            warn!("Failed to install Prometheus exporter: {}", e);
        }
    }
}

/// Counters for the finding pipeline.
pub struct PipelineMetrics;

impl PipelineMetrics {
    /// Record a finding that made it through enrich/persist/notify.
    pub fn record_processed() {
        ::metrics::counter!("findings_processed_total").increment(1);
    }

    /// Record a duplicate delivery short-circuited at the dedup gate.
    pub fn record_skipped() {
        ::metrics::counter!("findings_skipped_total").increment(1);
    }

    /// Record an invocation that failed and was handed back for redelivery.
    pub fn record_invocation_failure() {
        ::metrics::counter!("invocation_failures_total").increment(1);
    }

    /// Record an absorbed alert-publish failure.
    pub fn record_notify_failure() {
        ::metrics::counter!("alert_publish_failures_total").increment(1);
    }

    fn register_metrics() {
        use metrics::describe_counter;

        describe_counter!(
            "findings_processed_total",
            "Findings enriched, persisted and alerted on"
        );
        describe_counter!(
            "findings_skipped_total",
            "Duplicate deliveries short-circuited at the dedup gate"
        );
        describe_counter!(
            "invocation_failures_total",
            "Invocations that failed and were handed back for redelivery"
        );
        describe_counter!(
            "alert_publish_failures_total",
            "Alert publishes that failed and were absorbed"
        );
    }
}
