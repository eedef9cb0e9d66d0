//! Tunables for the adaptive optimizer (spec §4.6). All have the
//! spec's stated defaults.

use std::time::Duration;

pub const MIN_WORKERS: usize = 10;
pub const MAX_WORKERS: usize = 500;
pub const MIN_BATCH_SIZE: usize = 5;
pub const MAX_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// How often the optimizer recomputes recommendations.
    pub adjustment_interval: Duration,
    /// Size of the `recent_response_times` / `recent_errors` sliding windows.
    pub window_size: usize,
    /// How long `rate_limit_detected` stays true after the last observed rate-limit error.
    pub rate_limit_window: Duration,
    /// Consecutive-error count at which the pool is shrunk.
    pub rate_limit_threshold: u64,
    pub target_error_rate: f64,
    pub max_error_rate: f64,
    pub target_response_time: Duration,
    pub worker_increase_factor: f64,
    pub worker_decrease_factor: f64,
    pub batch_increase_factor: f64,
    pub batch_decrease_factor: f64,
    pub min_workers: usize,
    pub max_workers: usize,
    pub min_batch_size: usize,
    pub max_batch_size: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            adjustment_interval: Duration::from_secs(30),
            window_size: 100,
            rate_limit_window: Duration::from_secs(60),
            rate_limit_threshold: 5,
            target_error_rate: 0.01,
            max_error_rate: 0.05,
            target_response_time: Duration::from_millis(500),
            worker_increase_factor: 1.2,
            worker_decrease_factor: 0.8,
            batch_increase_factor: 1.2,
            batch_decrease_factor: 0.8,
            min_workers: MIN_WORKERS,
            max_workers: MAX_WORKERS,
            min_batch_size: MIN_BATCH_SIZE,
            max_batch_size: MAX_BATCH_SIZE,
        }
    }
}
