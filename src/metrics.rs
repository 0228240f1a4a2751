//! Operation metrics, recorded against an injected meter.

use std::time::Instant;

use opentelemetry::{
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Histogram and error counter for gateway operations.
///
/// Built from a caller-provided [`Meter`]; the gateway installs no global
/// metrics state of its own.
#[derive(Clone)]
pub struct GatewayMetrics {
    /// Histogram for operation latencies.
    pub operations: Histogram<f64>,

    /// Counter for operation errors.
    pub errors: Counter<u64>,
}

impl GatewayMetrics {
    pub fn new(meter: &Meter) -> Self {
        let operations = meter
            .f64_histogram("media_gateway_operation_duration_seconds")
            .with_description("Duration of media gateway operations in seconds")
            .build();

        let errors = meter
            .u64_counter("media_gateway_errors_total")
            .with_description("Total number of media gateway operation errors")
            .build();

        Self { operations, errors }
    }
}

/// Records elapsed time into a histogram when dropped.
pub struct Timer {
    start: Instant,
    histogram: Histogram<f64>,
    labels: Vec<KeyValue>,
}

impl Timer {
    /// Start a new timer with labels.
    pub fn start(histogram: &Histogram<f64>, labels: &[KeyValue]) -> Self {
        Self {
            start: Instant::now(),
            histogram: histogram.clone(),
            labels: labels.to_vec(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.record(duration, &self.labels);
    }
}
