//! Request pacing between batch items

use std::time::Duration;
use tracing::debug;

use crate::infrastructure::config::PacingConfig;

/// Hands out the delay to wait before each item.
///
/// The first item starts immediately; every later item waits the base
/// delay plus a uniformly random jitter in `0..=max_jitter_ms`.
#[derive(Debug, Clone)]
pub struct Pacer {
    base_delay_ms: u64,
    max_jitter_ms: u64,
    started: usize,
}

impl Pacer {
    pub fn new(config: &PacingConfig) -> Self {
        Self {
            base_delay_ms: config.base_delay_ms,
            max_jitter_ms: config.max_jitter_ms,
            started: 0,
        }
    }

    /// Delay to wait before starting the next item; `None` for the first one
    pub fn delay_before_next(&mut self) -> Option<Duration> {
        self.started += 1;
        if self.started == 1 {
            return None;
        }

        let jitter = fastrand::u64(0..=self.max_jitter_ms);
        let delay = Duration::from_millis(self.base_delay_ms.saturating_add(jitter));
        debug!("Waiting {:.2} seconds before next request", delay.as_secs_f64());
        Some(delay)
    }

    pub fn items_started(&self) -> usize {
        self.started
    }
}
