//! Scheduler clock over embassy-time

use embassy_time::{Instant, Timer};
use lumen_core::TaskClock;

/// Task clock backed by the RP2040 timer
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl TaskClock for EmbassyClock {
    async fn sleep_ms(&self, ms: u32) {
        Timer::after_millis(ms as u64).await
    }

    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
