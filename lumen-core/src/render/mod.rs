//! Render loop
//!
//! The task that owns the UI document's cadence. Each tick:
//!
//! 1. Lock the document and run one engine step
//! 2. Release the lock (the guard is scoped to the step)
//! 3. Clamp the engine's suggested delay to the configured window
//! 4. Let the tick observer produce readout text and push it into the
//!    document under a second, separate lock
//! 5. Sleep for the clamped delay
//!
//! The lock is never held across a sleep.

mod counter;

pub use counter::{DemoCounter, Readout, TickObserver};

use crate::config::RenderConfig;
use crate::document::UiDocument;
use crate::error::EngineError;
use crate::sync::UiLock;
use crate::traits::{PointerSource, RenderEngine, RunFlag, TaskClock};

/// Clamp an engine-suggested delay to `[min_delay_ms, max_delay_ms]`
pub fn clamp_delay(suggested_ms: u32, config: &RenderConfig) -> u32 {
    if suggested_ms > config.max_delay_ms {
        config.max_delay_ms
    } else if suggested_ms < config.min_delay_ms {
        config.min_delay_ms
    } else {
        suggested_ms
    }
}

/// Outcome of one render tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Delay actually slept, after clamping
    pub delay_ms: u32,
    /// Engine step failure, if the step failed
    pub engine_error: Option<EngineError>,
    /// Readout text was pushed into the document
    pub published: bool,
}

/// Periodic render task
pub struct RenderLoop<'a, E, P, C, O> {
    lock: &'a UiLock<UiDocument<E, P>>,
    clock: &'a C,
    observer: O,
    config: RenderConfig,
    run: &'a RunFlag,
    /// Last delay used; kept when a step fails
    delay_ms: u32,
}

impl<'a, E, P, C, O> RenderLoop<'a, E, P, C, O>
where
    E: RenderEngine,
    P: PointerSource,
    C: TaskClock,
    O: TickObserver,
{
    pub fn new(
        lock: &'a UiLock<UiDocument<E, P>>,
        clock: &'a C,
        observer: O,
        config: RenderConfig,
        run: &'a RunFlag,
    ) -> Self {
        Self {
            lock,
            clock,
            observer,
            delay_ms: config.max_delay_ms,
            config,
            run,
        }
    }

    /// Run one tick
    pub async fn tick(&mut self) -> TickReport {
        let step = {
            let mut doc = self.lock.lock().await;
            doc.step()
        };

        let engine_error = match step {
            Ok(suggested) => {
                self.delay_ms = suggested;
                None
            }
            Err(e) => {
                warn!("render step failed: {:?}", e);
                Some(e)
            }
        };

        let delay_ms = clamp_delay(self.delay_ms, &self.config);
        self.delay_ms = delay_ms;

        let published = match self.observer.on_tick() {
            Some(text) => {
                let mut doc = self.lock.lock().await;
                match doc.set_readout(&text) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("readout update failed: {:?}", e);
                        false
                    }
                }
            }
            None => false,
        };

        self.clock.sleep_ms(delay_ms).await;

        TickReport {
            delay_ms,
            engine_error,
            published,
        }
    }

    /// Tick until the run flag is cleared, returning the tick count
    pub async fn run(&mut self) -> u32 {
        info!(
            "render loop started, delay window [{}, {}] ms",
            self.config.min_delay_ms,
            self.config.max_delay_ms
        );

        let mut ticks = 0u32;
        while self.run.is_running() {
            self.tick().await;
            ticks = ticks.wrapping_add(1);
        }
        ticks
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }
}

/// Engine clock actor
///
/// Advances the render engine's internal clock by `period_ms` every period,
/// entering the UI lock through its own path. Returns the number of
/// advances once the run flag is cleared.
pub async fn drive_engine_clock<E, P, C>(
    lock: &UiLock<UiDocument<E, P>>,
    clock: &C,
    period_ms: u32,
    run: &RunFlag,
) -> u32
where
    E: RenderEngine,
    P: PointerSource,
    C: TaskClock,
{
    let mut advances = 0u32;
    while run.is_running() {
        {
            let mut doc = lock.lock().await;
            doc.engine_mut().tick_inc(period_ms);
        }
        advances = advances.wrapping_add(1);
        clock.sleep_ms(period_ms).await;
    }
    advances
}
