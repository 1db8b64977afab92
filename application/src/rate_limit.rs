//! Sliding-window rate limiter
//!
//! Admission gate in front of the remote decision source: at most
//! `max_calls` within any rolling `period`. Callers suspend in
//! [`RateLimiter::acquire`] until admitted rather than being rejected.
//!
//! The limiter is explicitly constructed and injected into agents; there
//! is no process-global instance.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Sliding-window admission gate
pub struct RateLimiter {
    max_calls: usize,
    period: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_calls: usize, period: Duration) -> Self {
        Self {
            max_calls: max_calls.max(1),
            period,
            timestamps: Mutex::new(VecDeque::new()),
        }
    }

    /// Limiter admitting `max_calls` per 60-second window
    pub fn per_minute(max_calls: usize) -> Self {
        Self::new(max_calls, Duration::from_secs(60))
    }

    /// Suspend until a new call is admitted under the rolling window.
    pub async fn acquire(&self) {
        loop {
            let sleep_for = {
                let now = Instant::now();
                let mut timestamps = self.timestamps.lock().await;

                while let Some(&oldest) = timestamps.front() {
                    if now.duration_since(oldest) >= self.period {
                        timestamps.pop_front();
                    } else {
                        break;
                    }
                }

                if timestamps.len() < self.max_calls {
                    timestamps.push_back(now);
                    return;
                }

                // Window is full: wait until the oldest call leaves it
                match timestamps.front() {
                    Some(&oldest) => self.period.saturating_sub(now.duration_since(oldest)),
                    None => Duration::ZERO,
                }
            };

            if sleep_for > Duration::ZERO {
                debug!("rate limit reached, sleeping for {:.2}s", sleep_for.as_secs_f64());
                tokio::time::sleep(sleep_for).await;
            } else {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    }
}
