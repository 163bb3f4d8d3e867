//! Prometheus metrics adapter
//!
//! Implements [`MetricsPort`] on top of the `metrics` facade with a
//! Prometheus recorder owned by this adapter. The recorder is never
//! installed globally; every update runs under `with_local_recorder`, so
//! several instances can coexist (one per test).

use application::ports::{FaultKind, MetricsPort};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

/// Total jobs processed successfully
pub const JOBS_PROCESSED_TOTAL: &str = "job_processor_jobs_processed_total";

/// Jobs processed in the last accounting window
pub const THROUGHPUT_JOBS_PER_SECOND: &str = "job_processor_throughput_jobs_per_second";

/// Total jobs whose handler failed
pub const JOBS_FAILED_TOTAL: &str = "job_processor_jobs_failed_total";

/// Total faults injected into requests, labelled by `kind`
pub const INJECTED_FAULTS_TOTAL: &str = "job_processor_injected_faults_total";

/// Metrics sink rendering the Prometheus text format
pub struct PrometheusMetrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics").finish_non_exhaustive()
    }
}

impl Default for PrometheusMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PrometheusMetrics {
    /// Create a sink with every series registered at zero
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let sink = Self { recorder, handle };

        sink.with_recorder(|| {
            metrics::describe_counter!(
                JOBS_PROCESSED_TOTAL,
                "The total number of processed jobs"
            );
            metrics::describe_gauge!(
                THROUGHPUT_JOBS_PER_SECOND,
                "The number of jobs processed per second"
            );
            metrics::describe_counter!(
                JOBS_FAILED_TOTAL,
                "The total number of jobs whose processing failed"
            );
            metrics::describe_counter!(
                INJECTED_FAULTS_TOTAL,
                "The total number of faults injected into requests"
            );

            metrics::counter!(JOBS_PROCESSED_TOTAL).absolute(0);
            metrics::counter!(JOBS_FAILED_TOTAL).absolute(0);
            metrics::gauge!(THROUGHPUT_JOBS_PER_SECOND).set(0.0);
            for kind in [FaultKind::Latency, FaultKind::Error] {
                metrics::counter!(INJECTED_FAULTS_TOTAL, "kind" => kind.as_str()).absolute(0);
            }
        });

        sink
    }

    fn with_recorder<T>(&self, f: impl FnOnce() -> T) -> T {
        metrics::with_local_recorder(&self.recorder, f)
    }

    /// Render all series in the Prometheus text exposition format
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl MetricsPort for PrometheusMetrics {
    fn record_job_processed(&self) {
        self.with_recorder(|| metrics::counter!(JOBS_PROCESSED_TOTAL).increment(1));
    }

    fn record_job_failed(&self) {
        self.with_recorder(|| metrics::counter!(JOBS_FAILED_TOTAL).increment(1));
    }

    #[allow(clippy::cast_precision_loss)]
    fn set_throughput(&self, jobs_per_second: u64) {
        self.with_recorder(|| {
            metrics::gauge!(THROUGHPUT_JOBS_PER_SECOND).set(jobs_per_second as f64);
        });
    }

    fn record_fault_injected(&self, kind: FaultKind) {
        self.with_recorder(|| {
            metrics::counter!(INJECTED_FAULTS_TOTAL, "kind" => kind.as_str()).increment(1);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Value of the first sample line starting with `series`
    fn sample(rendered: &str, series: &str) -> Option<f64> {
        rendered
            .lines()
            .filter(|line| !line.starts_with('#'))
            .find_map(|line| {
                let (name, value) = line.rsplit_once(' ')?;
                (name == series).then(|| value.parse().ok()).flatten()
            })
    }

    #[test]
    fn series_exist_before_first_update() {
        let metrics = PrometheusMetrics::new();
        let rendered = metrics.render();

        assert_eq!(sample(&rendered, JOBS_PROCESSED_TOTAL), Some(0.0));
        assert_eq!(sample(&rendered, JOBS_FAILED_TOTAL), Some(0.0));
        assert_eq!(sample(&rendered, THROUGHPUT_JOBS_PER_SECOND), Some(0.0));
        assert!(rendered.contains("# HELP job_processor_jobs_processed_total"));
        assert!(rendered.contains("# TYPE job_processor_throughput_jobs_per_second gauge"));
    }

    #[test]
    fn processed_counter_increments() {
        let metrics = PrometheusMetrics::new();
        for _ in 0..7 {
            metrics.record_job_processed();
        }
        metrics.record_job_failed();

        let rendered = metrics.render();
        assert_eq!(sample(&rendered, JOBS_PROCESSED_TOTAL), Some(7.0));
        assert_eq!(sample(&rendered, JOBS_FAILED_TOTAL), Some(1.0));
    }

    #[test]
    fn throughput_gauge_holds_last_value() {
        let metrics = PrometheusMetrics::new();
        metrics.set_throughput(12);
        assert_eq!(
            sample(&metrics.render(), THROUGHPUT_JOBS_PER_SECOND),
            Some(12.0)
        );

        metrics.set_throughput(0);
        assert_eq!(
            sample(&metrics.render(), THROUGHPUT_JOBS_PER_SECOND),
            Some(0.0)
        );
    }

    #[test]
    fn faults_are_labelled_by_kind() {
        let metrics = PrometheusMetrics::new();
        metrics.record_fault_injected(FaultKind::Error);
        metrics.record_fault_injected(FaultKind::Error);
        metrics.record_fault_injected(FaultKind::Latency);

        let rendered = metrics.render();
        assert_eq!(
            sample(
                &rendered,
                "job_processor_injected_faults_total{kind=\"error\"}"
            ),
            Some(2.0)
        );
        assert_eq!(
            sample(
                &rendered,
                "job_processor_injected_faults_total{kind=\"latency\"}"
            ),
            Some(1.0)
        );
    }

    #[test]
    fn instances_do_not_share_state() {
        let a = PrometheusMetrics::new();
        let b = PrometheusMetrics::new();
        a.record_job_processed();

        assert_eq!(sample(&a.render(), JOBS_PROCESSED_TOTAL), Some(1.0));
        assert_eq!(sample(&b.render(), JOBS_PROCESSED_TOTAL), Some(0.0));
    }
}
