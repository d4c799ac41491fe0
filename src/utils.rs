//! Miscellaneous helper utilities.

use chrono::{Duration, Utc};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Unix timestamp (seconds) `days` before `now`.
///
/// Saturates at `i64::MIN` when `days` is beyond chrono's range.
pub fn lookback_cutoff(now_secs: i64, days: i64) -> i64 {
    Duration::try_days(days)
        .map_or(i64::MIN, |window| now_secs.saturating_sub(window.num_seconds()))
}

/// Start of the rolling snapshot window ending now.
pub fn window_start(days: i64) -> i64 {
    lookback_cutoff(Utc::now().timestamp(), days)
}
