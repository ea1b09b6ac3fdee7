//! Scheduler time and run control

use portable_atomic::{AtomicBool, Ordering};

/// Scheduler clock seen by the core's tasks
///
/// Sleeping is a suspension point: the calling task yields the processor
/// until the delay has elapsed.
#[allow(async_fn_in_trait)]
pub trait TaskClock {
    /// Suspend the calling task for `ms` milliseconds
    async fn sleep_ms(&self, ms: u32);

    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
}

impl<C: TaskClock> TaskClock for &C {
    async fn sleep_ms(&self, ms: u32) {
        (**self).sleep_ms(ms).await
    }

    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Run flag for the core's infinite loops
///
/// Production firmware never clears it. Test harnesses clear it to make a
/// loop return after its current iteration.
#[derive(Debug)]
pub struct RunFlag {
    running: AtomicBool,
}

impl Default for RunFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl RunFlag {
    /// Create a flag in the running state
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(true),
        }
    }

    /// Check whether loops should keep iterating
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Ask every loop watching this flag to stop
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }
}
