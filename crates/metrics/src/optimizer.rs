//! Periodic worker-count / batch-size recommendation (spec §4.6).
//!
//! The fetcher reads these recommendations at batch boundaries; it
//! never interrupts an in-flight batch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;

use crate::config::OptimizerConfig;
use crate::tracker::RpcMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation {
    pub workers: usize,
    pub batch_size: usize,
}

/// Recomputes worker count and batch size from observed [`RpcMetrics`]
/// every `adjustment_interval`.
#[derive(Debug)]
pub struct Optimizer {
    config: OptimizerConfig,
    workers: AtomicU64,
    batch_size: AtomicU64,
    last_adjustment: Mutex<Option<Instant>>,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig, initial_workers: usize, initial_batch_size: usize) -> Self {
        let workers = initial_workers.clamp(config.min_workers, config.max_workers);
        let batch_size = initial_batch_size.clamp(config.min_batch_size, config.max_batch_size);
        Self {
            config,
            workers: AtomicU64::new(workers as u64),
            batch_size: AtomicU64::new(batch_size as u64),
            last_adjustment: Mutex::new(None),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers.load(Ordering::Relaxed) as usize
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.load(Ordering::Relaxed) as usize
    }

    /// Recomputes recommendations against `metrics` if at least
    /// `adjustment_interval` has elapsed since the last adjustment.
    /// Returns the (possibly unchanged) recommendation either way.
    pub fn maybe_adjust(&self, metrics: &RpcMetrics, now: Instant) -> Recommendation {
        let mut last = self.last_adjustment.lock();
        let due = match *last {
            None => true,
            Some(t) => now.duration_since(t) >= self.config.adjustment_interval,
        };
        if !due {
            return self.current();
        }
        *last = Some(now);
        drop(last);
        self.adjust(metrics, now)
    }

    /// Unconditionally recomputes, ignoring the interval gate. Exposed
    /// for tests and for callers driving their own scheduling.
    pub fn adjust(&self, metrics: &RpcMetrics, now: Instant) -> Recommendation {
        let rate_limited = metrics.rate_limit_detected(now);
        let consecutive_errors = metrics.consecutive_errors();
        let error_rate = metrics.error_rate();
        let avg_response = metrics.average_response_time();

        let shrink = rate_limited
            || consecutive_errors >= self.config.rate_limit_threshold
            || error_rate > self.config.max_error_rate
            || avg_response > self.config.target_response_time * 2;
        let grow = !shrink && error_rate < self.config.target_error_rate && avg_response < self.config.target_response_time;

        let worker_factor = if rate_limited {
            0.5
        } else if shrink {
            self.config.worker_decrease_factor
        } else if grow {
            self.config.worker_increase_factor
        } else {
            1.0
        };
        let batch_factor = if rate_limited {
            0.5
        } else if shrink {
            self.config.batch_decrease_factor
        } else if grow {
            self.config.batch_increase_factor
        } else {
            1.0
        };

        let new_workers = scale(self.workers(), worker_factor, self.config.min_workers, self.config.max_workers);
        let new_batch = scale(self.batch_size(), batch_factor, self.config.min_batch_size, self.config.max_batch_size);

        self.workers.store(new_workers as u64, Ordering::Relaxed);
        self.batch_size.store(new_batch as u64, Ordering::Relaxed);
        metrics::gauge!("indexer_optimizer_workers").set(new_workers as f64);
        metrics::gauge!("indexer_optimizer_batch_size").set(new_batch as f64);

        Recommendation { workers: new_workers, batch_size: new_batch }
    }

    pub fn current(&self) -> Recommendation {
        Recommendation { workers: self.workers(), batch_size: self.batch_size() }
    }
}

fn scale(current: usize, factor: f64, min: usize, max: usize) -> usize {
    let scaled = (current as f64 * factor).round() as i64;
    scaled.clamp(min as i64, max as i64) as usize
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn metrics_with(window: usize) -> RpcMetrics {
        RpcMetrics::new(window, Duration::from_secs(60))
    }

    #[test]
    fn rate_limit_halves_worker_and_batch_count() {
        let config = OptimizerConfig::default();
        let opt = Optimizer::new(config, 100, 20);
        let m = metrics_with(100);
        let t0 = Instant::now();
        m.record_call(Duration::from_millis(10), false, true, t0);

        let rec = opt.adjust(&m, t0);
        assert_eq!(rec.workers, 50);
        assert_eq!(rec.batch_size, 10);
    }

    #[test]
    fn high_error_rate_shrinks_by_decrease_factor() {
        let config = OptimizerConfig::default();
        let opt = Optimizer::new(config, 100, 20);
        let m = metrics_with(20);
        let t0 = Instant::now();
        for _ in 0..2 {
            m.record_call(Duration::from_millis(10), false, false, t0);
        }
        for _ in 0..18 {
            m.record_call(Duration::from_millis(10), true, false, t0);
        }

        let rec = opt.adjust(&m, t0);
        assert_eq!(rec.workers, 80);
        assert_eq!(rec.batch_size, 16);
    }

    #[test]
    fn low_error_rate_and_fast_response_grows_pool() {
        let config = OptimizerConfig::default();
        let opt = Optimizer::new(config, 100, 20);
        let m = metrics_with(100);
        let t0 = Instant::now();
        for _ in 0..100 {
            m.record_call(Duration::from_millis(10), true, false, t0);
        }

        let rec = opt.adjust(&m, t0);
        assert_eq!(rec.workers, 120);
        assert_eq!(rec.batch_size, 24);
    }

    #[test]
    fn recommendation_is_clamped_to_configured_bounds() {
        let config = OptimizerConfig::default();
        let opt = Optimizer::new(config, crate::config::MIN_WORKERS, crate::config::MIN_BATCH_SIZE);
        let m = metrics_with(100);
        let t0 = Instant::now();
        m.record_call(Duration::from_millis(10), false, true, t0);

        let rec = opt.adjust(&m, t0);
        assert!(rec.workers >= crate::config::MIN_WORKERS);
        assert!(rec.batch_size >= crate::config::MIN_BATCH_SIZE);
    }

    #[test]
    fn maybe_adjust_is_gated_by_adjustment_interval() {
        let mut config = OptimizerConfig::default();
        config.adjustment_interval = Duration::from_secs(30);
        let opt = Optimizer::new(config, 100, 20);
        let m = metrics_with(100);
        let t0 = Instant::now();
        m.record_call(Duration::from_millis(10), false, true, t0);

        let first = opt.maybe_adjust(&m, t0);
        assert_eq!(first.workers, 50);

        // A second rate-limit hit within the interval must not trigger another halving yet.
        m.record_call(Duration::from_millis(10), false, true, t0 + Duration::from_secs(5));
        let second = opt.maybe_adjust(&m, t0 + Duration::from_secs(5));
        assert_eq!(second.workers, 50);

        let third = opt.maybe_adjust(&m, t0 + Duration::from_secs(31));
        assert_eq!(third.workers, 25);
    }

    /// Mirrors the seed scenario of a rate-limit error injected
    /// periodically: the recommended worker count must strictly
    /// decrease after one adjustment interval.
    #[test]
    fn periodic_rate_limit_errors_strictly_decrease_recommended_workers() {
        let config = OptimizerConfig::default();
        let opt = Optimizer::new(config, 200, 40);
        let m = metrics_with(100);
        let t0 = Instant::now();
        for i in 0..30 {
            let rate_limited = i % 10 == 9;
            m.record_call(Duration::from_millis(50), !rate_limited, rate_limited, t0);
        }

        let before = opt.current().workers;
        let after = opt.adjust(&m, t0);
        assert!(after.workers < before);
    }
}
