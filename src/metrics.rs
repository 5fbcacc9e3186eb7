//! Metrics collection using Prometheus
//!
//! A small registry tracking prediction traffic and solve latency, exposed
//! as text on the `/metrics` endpoint.

use anyhow::Result;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Metrics collector for the rating service
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Registry,

    /// Prediction requests by outcome label
    pub predictions_total: IntCounterVec,

    /// Wall time spent computing one full prediction sweep
    pub sweep_duration_seconds: Histogram,

    /// Teams involved in the most recent rating solve
    pub last_team_count: IntGauge,
}

impl MetricsCollector {
    /// Create a collector with all metrics registered
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let predictions_total = IntCounterVec::new(
            Opts::new(
                "lrd_predictions_total",
                "Prediction requests processed, labeled by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let sweep_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "lrd_sweep_duration_seconds",
            "Time spent computing one prediction sweep",
        ))?;
        registry.register(Box::new(sweep_duration_seconds.clone()))?;

        let last_team_count = IntGauge::new(
            "lrd_last_team_count",
            "Number of teams in the most recent rating solve",
        )?;
        registry.register(Box::new(last_team_count.clone()))?;

        Ok(Self {
            registry,
            predictions_total,
            sweep_duration_seconds,
            last_team_count,
        })
    }

    /// Record a completed prediction request
    pub fn record_prediction(&self, outcome: &str, duration_seconds: f64, team_count: usize) {
        self.predictions_total.with_label_values(&[outcome]).inc();
        self.sweep_duration_seconds.observe(duration_seconds);
        self.last_team_count.set(team_count as i64);
    }

    /// Record a failed prediction request
    pub fn record_failure(&self, outcome: &str) {
        self.predictions_total.with_label_values(&[outcome]).inc();
    }

    /// Render all registered metrics in Prometheus text format
    pub fn gather(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_gather() {
        let metrics = MetricsCollector::new().unwrap();
        metrics.record_prediction("success", 0.012, 8);
        metrics.record_failure("malformed_input");

        let text = metrics.gather().unwrap();
        assert!(text.contains("lrd_predictions_total"));
        assert!(text.contains("lrd_sweep_duration_seconds"));
        assert!(text.contains("lrd_last_team_count"));
    }

    #[test]
    fn test_outcome_labels_are_independent() {
        let metrics = MetricsCollector::new().unwrap();
        metrics.record_failure("unknown_team");
        metrics.record_failure("unknown_team");
        metrics.record_failure("unsolvable");

        assert_eq!(
            metrics
                .predictions_total
                .with_label_values(&["unknown_team"])
                .get(),
            2
        );
        assert_eq!(
            metrics
                .predictions_total
                .with_label_values(&["unsolvable"])
                .get(),
            1
        );
    }
}
