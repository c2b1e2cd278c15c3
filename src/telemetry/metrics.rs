//! Prometheus metrics setup and metric definitions

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle> {
    // Seconds. Sub-millisecond buckets cover cached and health endpoints.
    let buckets = [
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions and emit initial zero values so Prometheus output
/// includes HELP/TYPE lines for all metrics from startup (not just after first use).
pub fn describe_metrics() {
    // HTTP metrics
    describe_counter!("foodtip_http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "foodtip_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_gauge!(
        "foodtip_http_requests_in_flight",
        "Number of HTTP requests currently being processed"
    );

    // Auth metrics
    describe_counter!(
        "foodtip_auth_login_total",
        "Login attempts by provider and result"
    );

    // Moderation metrics
    describe_counter!(
        "foodtip_submissions_created_total",
        "Total number of submissions received"
    );
    describe_counter!(
        "foodtip_submission_transitions_total",
        "Submissions approved into or rejected from the catalog"
    );

    counter!("foodtip_auth_login_total", "provider" => "local", "result" => "success")
        .absolute(0);
    counter!("foodtip_submissions_created_total").absolute(0);
    counter!("foodtip_submission_transitions_total", "status" => "approved").absolute(0);
    counter!("foodtip_submission_transitions_total", "status" => "rejected").absolute(0);
    gauge!("foodtip_http_requests_in_flight").set(0.0);
}
