//! Secondary task
//!
//! An independently scheduled loop that shares nothing with the render path.
//! It sleeps for a fixed period and optionally toggles a heartbeat output
//! it owns exclusively.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};

use crate::traits::{RunFlag, TaskClock};

/// Placeholder output for a task without a heartbeat
pub struct NoHeartbeat;

impl ErrorType for NoHeartbeat {
    type Error = Infallible;
}

impl OutputPin for NoHeartbeat {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Fixed-period background task
pub struct SecondaryTask<'a, C, L = NoHeartbeat> {
    clock: &'a C,
    period_ms: u32,
    run: &'a RunFlag,
    heartbeat: Option<L>,
    lit: bool,
}

impl<'a, C: TaskClock> SecondaryTask<'a, C, NoHeartbeat> {
    pub fn new(clock: &'a C, period_ms: u32, run: &'a RunFlag) -> Self {
        Self {
            clock,
            period_ms,
            run,
            heartbeat: None,
            lit: false,
        }
    }

    /// Toggle `pin` once per period
    pub fn with_heartbeat<L: OutputPin>(self, pin: L) -> SecondaryTask<'a, C, L> {
        SecondaryTask {
            clock: self.clock,
            period_ms: self.period_ms,
            run: self.run,
            heartbeat: Some(pin),
            lit: false,
        }
    }
}

impl<'a, C: TaskClock, L: OutputPin> SecondaryTask<'a, C, L> {
    /// Loop until the run flag is cleared, returning the iteration count
    pub async fn run(&mut self) -> u32 {
        debug!("secondary task started, period {} ms", self.period_ms);

        let mut iterations = 0u32;
        while self.run.is_running() {
            self.beat();
            self.clock.sleep_ms(self.period_ms).await;
            iterations = iterations.wrapping_add(1);
        }
        iterations
    }

    fn beat(&mut self) {
        let Some(pin) = self.heartbeat.as_mut() else {
            return;
        };

        self.lit = !self.lit;
        let result = if self.lit { pin.set_high() } else { pin.set_low() };
        if result.is_err() {
            warn!("heartbeat output failed");
        }
    }

    /// Give the heartbeat output back
    pub fn into_heartbeat(self) -> Option<L> {
        self.heartbeat
    }
}
