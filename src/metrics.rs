//! Prediction metrics and statistics tracking for the rating service.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Number of rating buckets, each 0.5 wide over 0.0..5.0
const RATING_BUCKETS: usize = 10;

/// Metrics collector for served predictions
pub struct PredictionMetrics {
    /// Successful predictions
    pub predictions_served: AtomicU64,
    /// Requests rejected during normalization
    pub invalid_inputs: AtomicU64,
    /// Requests where the predictor failed
    pub prediction_failures: AtomicU64,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Predicted rating distribution
    rating_buckets: RwLock<[u64; RATING_BUCKETS]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PredictionMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            predictions_served: AtomicU64::new(0),
            invalid_inputs: AtomicU64::new(0),
            prediction_failures: AtomicU64::new(0),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            rating_buckets: RwLock::new([0; RATING_BUCKETS]),
            start_time: Instant::now(),
        }
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, processing_time: Duration, rating: f64) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only the most recent window
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let bucket = ((rating * 2.0).max(0.0) as usize).min(RATING_BUCKETS - 1);
        if let Ok(mut buckets) = self.rating_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a failed request by error kind
    pub fn record_failure(&self, kind: &str) {
        match kind {
            "invalid_input" => self.invalid_inputs.fetch_add(1, Ordering::Relaxed),
            _ => self.prediction_failures.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let sorted = match self.processing_times.read() {
            Ok(times) if !times.is_empty() => {
                let mut sorted = times.clone();
                sorted.sort_unstable();
                sorted
            }
            _ => return ProcessingStats::default(),
        };

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();
        let at = |q: f64| sorted[((count as f64 * q) as usize).min(count - 1)];

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: at(0.95),
            p99_us: at(0.99),
            max_us: sorted[count - 1],
        }
    }

    /// Get current throughput (predictions per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions_served.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get rating distribution
    pub fn get_rating_distribution(&self) -> [u64; RATING_BUCKETS] {
        self.rating_buckets
            .read()
            .map(|buckets| *buckets)
            .unwrap_or_default()
    }

    /// Point-in-time copy of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            predictions_served: self.predictions_served.load(Ordering::Relaxed),
            invalid_inputs: self.invalid_inputs.load(Ordering::Relaxed),
            prediction_failures: self.prediction_failures.load(Ordering::Relaxed),
            throughput_per_sec: self.get_throughput(),
            processing: self.get_processing_stats(),
            rating_distribution: self.get_rating_distribution(),
        }
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();
        let processing = &snapshot.processing;

        info!(
            served = snapshot.predictions_served,
            invalid_inputs = snapshot.invalid_inputs,
            prediction_failures = snapshot.prediction_failures,
            throughput = format!("{:.2} req/s", snapshot.throughput_per_sec),
            "Prediction metrics summary"
        );
        info!(
            mean_us = processing.mean_us,
            p50_us = processing.p50_us,
            p95_us = processing.p95_us,
            p99_us = processing.p99_us,
            max_us = processing.max_us,
            "Processing time"
        );

        let total: u64 = snapshot.rating_distribution.iter().sum();
        for (i, &count) in snapshot.rating_distribution.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let pct = (count as f64 / total as f64) * 100.0;
            let bar: String = "█".repeat(((pct / 5.0) as usize).min(20));
            info!(
                "  {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 2.0,
                (i + 1) as f64 / 2.0,
                count,
                pct,
                bar
            );
        }
    }
}

impl Default for PredictionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Serializable view of [`PredictionMetrics`]
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub predictions_served: u64,
    pub invalid_inputs: u64,
    pub prediction_failures: u64,
    pub throughput_per_sec: f64,
    pub processing: ProcessingStats,
    pub rating_distribution: [u64; RATING_BUCKETS],
}

/// Metrics reporter that logs periodic summaries
pub struct MetricsReporter {
    metrics: Arc<PredictionMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<PredictionMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    ///
    /// An interval of zero disables reporting and returns immediately.
    pub async fn start(self) {
        if self.interval_secs == 0 {
            warn!("Metrics report interval is 0, periodic reporting disabled");
            return;
        }
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = PredictionMetrics::new();

        metrics.record_prediction(Duration::from_micros(100), 3.6);
        metrics.record_prediction(Duration::from_micros(300), 4.2);
        metrics.record_failure("invalid_input");
        metrics.record_failure("prediction");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.predictions_served, 2);
        assert_eq!(snapshot.invalid_inputs, 1);
        assert_eq!(snapshot.prediction_failures, 1);
        assert_eq!(snapshot.processing.count, 2);
        assert_eq!(snapshot.processing.mean_us, 200);
        assert_eq!(snapshot.processing.max_us, 300);
    }

    #[test]
    fn test_rating_buckets() {
        let metrics = PredictionMetrics::new();

        metrics.record_prediction(Duration::from_micros(10), 0.2);
        metrics.record_prediction(Duration::from_micros(10), 3.6);
        metrics.record_prediction(Duration::from_micros(10), 5.0);
        metrics.record_prediction(Duration::from_micros(10), -1.0);

        let dist = metrics.get_rating_distribution();
        assert_eq!(dist[0], 2);
        assert_eq!(dist[7], 1);
        assert_eq!(dist[9], 1);
    }

    #[test]
    fn test_empty_stats() {
        let metrics = PredictionMetrics::new();
        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.max_us, 0);
    }

    #[tokio::test]
    async fn test_reporter_zero_interval_returns() {
        let metrics = Arc::new(PredictionMetrics::new());
        let reporter = MetricsReporter::new(metrics, 0);

        tokio::time::timeout(Duration::from_secs(1), reporter.start())
            .await
            .expect("reporter with zero interval should return");
    }
}
