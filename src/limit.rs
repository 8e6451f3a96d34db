//! Sliding-window request limiter.
//!
//! An explicit, injectable state container: constructed once at process
//! start and passed by reference to handlers. No ambient singleton, no
//! background sweeper; expired windows are pruned on access.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::LimitConfig;
use crate::error::{AnalysisError, Result};

struct Window {
    count: u32,
    reset_at: Instant,
}

/// Per-key fixed-window request counter.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    entries: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: &LimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_secs),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request for `key`, rejecting it when the window is full.
    pub fn check(&self, key: &str) -> Result<()> {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("rate limiter lock poisoned");

        entries.retain(|_, w| w.reset_at > now);

        match entries.get_mut(key) {
            Some(window) => {
                if window.count >= self.max_requests {
                    let retry_after_secs =
                        window.reset_at.saturating_duration_since(now).as_secs().max(1);
                    return Err(AnalysisError::RateLimited { retry_after_secs });
                }
                window.count += 1;
                Ok(())
            }
            None => {
                entries.insert(
                    key.to_string(),
                    Window {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                Ok(())
            }
        }
    }
}
