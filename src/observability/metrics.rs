use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    HistogramVec, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap()
});

static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request latency in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.010, 0.050, 0.100, 0.500, 1.0, 5.0]
    )
    .unwrap()
});

static EVENTS_RECEIVED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "events_received_total",
        "Total number of events accepted by the ingestion endpoint"
    )
    .unwrap()
});

static EVENTS_PROCESSED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "events_processed_total",
        "Total number of unique events written to the event store"
    )
    .unwrap()
});

static EVENTS_DUPLICATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "events_duplicated_total",
        "Total number of duplicate events dropped by the event store"
    )
    .unwrap()
});

static QUEUE_DEPTH: Lazy<IntGauge> =
    Lazy::new(|| register_int_gauge!("queue_depth", "Current depth of the broker queue").unwrap());

static WORKER_BACKOFF_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "worker_backoff_total",
        "Total number of backoff sleeps entered by consumer workers",
        &["worker_id"]
    )
    .unwrap()
});

pub struct MetricsRecorder;

impl MetricsRecorder {
    pub fn record_http_request(method: &str, path: &str, status: u16) {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&[method, path, &status.to_string()])
            .inc();
    }

    pub fn record_http_duration(method: &str, path: &str, duration: f64) {
        HTTP_REQUEST_DURATION
            .with_label_values(&[method, path])
            .observe(duration);
    }

    pub fn record_event_received() {
        EVENTS_RECEIVED_TOTAL.inc();
    }

    pub fn record_event_processed() {
        EVENTS_PROCESSED_TOTAL.inc();
    }

    pub fn record_event_duplicated() {
        EVENTS_DUPLICATED_TOTAL.inc();
    }

    pub fn set_queue_depth(depth: i64) {
        QUEUE_DEPTH.set(depth);
    }

    pub fn record_worker_backoff(worker_id: usize) {
        WORKER_BACKOFF_TOTAL
            .with_label_values(&[&worker_id.to_string()])
            .inc();
    }

    /// Export all metrics in Prometheus text format.
    pub fn export() -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        encoder.encode_to_string(&metric_families)
    }
}
