use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Store Metrics
    pub static ref DB_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "db_operations_total",
        "Total number of data store operations",
        &["operation", "collection", "status"]
    )
    .unwrap();

    pub static ref DB_OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "db_operation_duration_seconds",
        "Data store operation duration in seconds",
        &["operation", "collection"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .unwrap();

    // Practice Metrics
    pub static ref SESSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "practice_sessions_total",
        "Practice session transitions",
        &["module", "status"]
    )
    .unwrap();

    pub static ref SUBMISSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "practice_submissions_total",
        "Scored submissions by skill",
        &["skill"]
    )
    .unwrap();

    pub static ref BAND_SCORES: HistogramVec = register_histogram_vec!(
        "practice_band_score",
        "Distribution of awarded band scores",
        &["skill"],
        vec![3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.5]
    )
    .unwrap();

    pub static ref EVALUATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "evaluation_duration_seconds",
        "Writing/speaking evaluation latency in seconds",
        &["evaluator", "skill"],
        vec![0.01, 0.1, 0.5, 1.0, 1.5, 2.0, 5.0, 10.0]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: track data store operation with metrics
pub async fn track_db_operation<F, T>(
    operation: &str,
    collection: &str,
    future: F,
) -> Result<T, anyhow::Error>
where
    F: std::future::Future<Output = Result<T, anyhow::Error>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let status = if result.is_ok() { "success" } else { "error" };

    DB_OPERATIONS_TOTAL
        .with_label_values(&[operation, collection, status])
        .inc();

    DB_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation, collection])
        .observe(duration);

    result
}

/// Record a scored submission and its band
pub fn record_submission(skill: &str, band: Option<f64>) {
    SUBMISSIONS_TOTAL.with_label_values(&[skill]).inc();
    if let Some(band) = band {
        BAND_SCORES.with_label_values(&[skill]).observe(band);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        let _ = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/health", "200"])
            .get();
        let _ = SESSIONS_TOTAL
            .with_label_values(&["reading", "in_progress"])
            .get();
    }

    #[test]
    fn test_render_metrics() {
        record_submission("reading", Some(7.0));

        let output = render_metrics().unwrap();
        assert!(output.contains("practice_submissions_total"));
        assert!(output.contains("practice_band_score"));
    }
}
