//! Structured logging for report runs
//!
//! Every significant step of a run is emitted as a `tracing` event with an
//! `event` field so JSON log output can be filtered by step.

use crate::quantity::QuantityError;
use crate::report::ReportSummary;
use std::path::Path;
use tracing::{debug, info, warn};

/// Structured logger for report run events
#[derive(Debug, Clone, Copy, Default)]
pub struct RunLogger {
    _private: (),
}

impl RunLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the start of a run
    pub fn log_run_started(&self, version: &str, source: &str) {
        info!(
            event = "run_started",
            version = %version,
            source = %source,
            "Collecting pod resources"
        );
    }

    /// Log the outcome of the cluster query
    pub fn log_pods_fetched(&self, source: &str, pods: usize) {
        info!(
            event = "pods_fetched",
            source = %source,
            pods = pods,
            "Fetched pod specifications"
        );
    }

    /// Log a quantity that could not be normalized
    pub fn log_normalization_failure(
        &self,
        namespace: &str,
        pod_name: &str,
        container: &str,
        field: &str,
        raw_value: &str,
        error: &QuantityError,
    ) {
        warn!(
            event = "normalization_failed",
            namespace = %namespace,
            pod_name = %pod_name,
            container = %container,
            field = %field,
            raw_value = %raw_value,
            error = %error,
            "Error normalizing {}", field
        );
    }

    /// Log a completed report file
    pub fn log_report_written(&self, path: &Path, rows: usize, summary: &ReportSummary) {
        if summary.normalization_failures > 0 {
            warn!(
                event = "report_written",
                path = %path.display(),
                rows = rows,
                pods = summary.pods,
                normalization_failures = summary.normalization_failures,
                "Report written with unnormalized fields left at zero"
            );
        } else {
            info!(
                event = "report_written",
                path = %path.display(),
                rows = rows,
                pods = summary.pods,
                "Report written"
            );
        }
    }

    /// Log a settings source that was picked up
    pub fn log_settings_file(&self, path: &Path) {
        debug!(
            event = "settings_loaded",
            path = %path.display(),
            "Loaded settings file"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_events_without_subscriber() {
        // Events are dropped when no subscriber is installed
        let logger = RunLogger::new();
        logger.log_run_started("0.1.0", "kubectl");
        logger.log_pods_fetched("kubectl", 3);
        logger.log_normalization_failure(
            "default",
            "web",
            "app",
            "CPU request",
            "5Gi",
            &QuantityError::UnknownUnit("gi".into()),
        );
        logger.log_report_written(
            Path::new("pod_resources.csv"),
            3,
            &ReportSummary {
                pods: 1,
                containers: 3,
                normalization_failures: 1,
            },
        );
    }
}
