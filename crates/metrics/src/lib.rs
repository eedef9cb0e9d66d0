//! Adaptive RPC metrics tracking and worker/batch-size optimizer
//! (component F): sliding-window latency/error observation feeding a
//! periodic recommendation the fetcher reads at batch boundaries.

mod config;
mod optimizer;
mod tracker;
mod window;

pub use config::{OptimizerConfig, MAX_BATCH_SIZE, MAX_WORKERS, MIN_BATCH_SIZE, MIN_WORKERS};
pub use optimizer::{Optimizer, Recommendation};
pub use tracker::RpcMetrics;
pub use window::SlidingWindow;
