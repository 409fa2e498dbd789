use crate::error::AppError;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the Prometheus recorder for this process
///
/// Fails if a recorder is already installed.
pub fn init_metrics() -> Result<PrometheusHandle, AppError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| AppError::Metrics(e.to_string()))?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "guniq_price_fetches_total",
        "Attachment price fetches by outcome"
    );
    describe_counter!(
        "guniq_price_fetch_errors_total",
        "Failed attachment price fetches by reason"
    );
    describe_histogram!(
        "guniq_price_fetch_duration_seconds",
        "Duration of a single attachment price fetch"
    );
    describe_histogram!(
        "guniq_price_batch_duration_seconds",
        "Duration of fetching every attachment price for one firearm"
    );
    describe_counter!("guniq_sign_ins_total", "Sign-in attempts by outcome");
    describe_gauge!("guniq_info", "GunIQ version information");

    gauge!("guniq_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record one price fetch; `error_kind` is set for failures
pub fn record_price_fetch(attachment: &str, duration: Duration, error_kind: Option<&str>) {
    let outcome = if error_kind.is_some() {
        "unavailable"
    } else {
        "available"
    };

    counter!("guniq_price_fetches_total", "outcome" => outcome).increment(1);
    histogram!(
        "guniq_price_fetch_duration_seconds",
        "attachment" => attachment.to_string(),
    )
    .record(duration.as_secs_f64());

    if let Some(kind) = error_kind {
        counter!("guniq_price_fetch_errors_total", "reason" => kind.to_string()).increment(1);
    }
}

/// Record a completed batch of price fetches
pub fn record_price_batch(strategy: &str, duration: Duration) {
    histogram!("guniq_price_batch_duration_seconds", "strategy" => strategy.to_string())
        .record(duration.as_secs_f64());
}

/// Record a sign-in attempt
pub fn record_sign_in(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!("guniq_sign_ins_total", "outcome" => outcome).increment(1);
}
