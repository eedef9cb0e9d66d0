//! Per-RPC-call metrics tracking (spec §4.6).

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::window::SlidingWindow;

#[derive(Debug)]
struct Inner {
    response_times: SlidingWindow<u64>,
    errors: SlidingWindow<bool>,
    consecutive_errors: u64,
    last_rate_limit_at: Option<Instant>,
    blocks_committed_since_tick: u64,
    throughput: f64,
    last_throughput_tick: Option<Instant>,
}

/// Tracks response time, error, and rate-limit observations in two
/// sliding windows, plus blocks/sec throughput. Safe to share across
/// worker threads.
#[derive(Debug)]
pub struct RpcMetrics {
    window_size: usize,
    rate_limit_window: Duration,
    inner: Mutex<Inner>,
}

impl RpcMetrics {
    pub fn new(window_size: usize, rate_limit_window: Duration) -> Self {
        Self {
            window_size,
            rate_limit_window,
            inner: Mutex::new(Inner {
                response_times: SlidingWindow::new(window_size),
                errors: SlidingWindow::new(window_size),
                consecutive_errors: 0,
                last_rate_limit_at: None,
                blocks_committed_since_tick: 0,
                throughput: 0.0,
                last_throughput_tick: None,
            }),
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Records the outcome of one RPC call. `rate_limited` implies `success = false`.
    pub fn record_call(&self, response_time: Duration, success: bool, rate_limited: bool, now: Instant) {
        let mut inner = self.inner.lock();
        inner.response_times.push(response_time.as_millis() as u64);
        inner.errors.push(!success);

        if success {
            inner.consecutive_errors = 0;
        } else {
            inner.consecutive_errors += 1;
        }

        if rate_limited {
            inner.last_rate_limit_at = Some(now);
            metrics::counter!("indexer_rpc_rate_limited_total").increment(1);
        }

        metrics::histogram!("indexer_rpc_response_time_ms").record(response_time.as_millis() as f64);
        metrics::counter!("indexer_rpc_calls_total", "success" => success.to_string()).increment(1);
    }

    /// Records that `count` blocks were committed as of `now`; throughput
    /// refreshes at most once per wall second (spec §4.6).
    pub fn record_blocks_committed(&self, count: u64, now: Instant) {
        let mut inner = self.inner.lock();
        inner.blocks_committed_since_tick += count;

        match inner.last_throughput_tick {
            None => inner.last_throughput_tick = Some(now),
            Some(last) if now.duration_since(last) >= Duration::from_secs(1) => {
                let elapsed = now.duration_since(last).as_secs_f64();
                inner.throughput = inner.blocks_committed_since_tick as f64 / elapsed;
                inner.blocks_committed_since_tick = 0;
                inner.last_throughput_tick = Some(now);
                metrics::gauge!("indexer_throughput_blocks_per_sec").set(inner.throughput);
            }
            Some(_) => {}
        }
    }

    pub fn average_response_time(&self) -> Duration {
        Duration::from_millis(self.inner.lock().response_times.average() as u64)
    }

    pub fn error_rate(&self) -> f64 {
        self.inner.lock().errors.true_rate()
    }

    pub fn success_rate(&self) -> f64 {
        1.0 - self.error_rate()
    }

    pub fn consecutive_errors(&self) -> u64 {
        self.inner.lock().consecutive_errors
    }

    pub fn throughput_blocks_per_sec(&self) -> f64 {
        self.inner.lock().throughput
    }

    /// True if a rate-limit error was observed within `rate_limit_window` of `now`.
    pub fn rate_limit_detected(&self, now: Instant) -> bool {
        match self.inner.lock().last_rate_limit_at {
            Some(at) => now.duration_since(at) < self.rate_limit_window,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_errors_resets_on_success() {
        let m = RpcMetrics::new(100, Duration::from_secs(60));
        let t0 = Instant::now();
        m.record_call(Duration::from_millis(10), false, false, t0);
        m.record_call(Duration::from_millis(10), false, false, t0);
        assert_eq!(m.consecutive_errors(), 2);
        m.record_call(Duration::from_millis(10), true, false, t0);
        assert_eq!(m.consecutive_errors(), 0);
    }

    #[test]
    fn rate_limit_detected_expires_after_window() {
        let m = RpcMetrics::new(100, Duration::from_secs(60));
        let t0 = Instant::now();
        m.record_call(Duration::from_millis(5), false, true, t0);
        assert!(m.rate_limit_detected(t0 + Duration::from_secs(10)));
        assert!(!m.rate_limit_detected(t0 + Duration::from_secs(61)));
    }

    #[test]
    fn average_response_time_and_error_rate() {
        let m = RpcMetrics::new(10, Duration::from_secs(60));
        let t0 = Instant::now();
        m.record_call(Duration::from_millis(100), true, false, t0);
        m.record_call(Duration::from_millis(200), true, false, t0);
        m.record_call(Duration::from_millis(300), false, false, t0);
        assert_eq!(m.average_response_time(), Duration::from_millis(200));
        assert!((m.error_rate() - (1.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn throughput_updates_at_most_once_per_second() {
        let m = RpcMetrics::new(10, Duration::from_secs(60));
        let t0 = Instant::now();
        m.record_blocks_committed(5, t0);
        assert_eq!(m.throughput_blocks_per_sec(), 0.0);
        m.record_blocks_committed(5, t0 + Duration::from_millis(500));
        assert_eq!(m.throughput_blocks_per_sec(), 0.0);
        m.record_blocks_committed(10, t0 + Duration::from_secs(2));
        assert!(m.throughput_blocks_per_sec() > 0.0);
    }
}
