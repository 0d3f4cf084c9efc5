//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_dataset_fallback, record_http_request,
    record_prediction, record_training, PrometheusMetrics, TrainingOutcome,
};
