//! Render engine over an `embedded-graphics` draw target

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use lumen_core::{EngineError, PointerSource, RenderEngine};
use lumen_hal::DriverError;

use crate::screen::{Screen, WidgetId};

/// Timer periods, in engine clock milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineTimers {
    /// Minimum spacing between redraws
    pub refresh_period_ms: u32,
    /// Pointer sampling period
    pub input_period_ms: u32,
}

impl Default for EngineTimers {
    fn default() -> Self {
        Self {
            refresh_period_ms: 30,
            input_period_ms: 30,
        }
    }
}

/// Screen engine driving one draw target
///
/// The engine clock starts at zero and only advances through `tick_inc`, so
/// both timers are due on the first `handle_timers` call.
pub struct ScreenEngine<D> {
    target: D,
    screen: Screen,
    timers: EngineTimers,
    now_ms: u64,
    next_refresh_ms: u64,
    next_input_ms: u64,
    refreshes: u32,
}

impl<D> ScreenEngine<D>
where
    D: DrawTarget<Color = Rgb565, Error = DriverError>,
{
    pub fn new(target: D, timers: EngineTimers) -> Self {
        Self {
            target,
            screen: Screen::new(),
            timers,
            now_ms: 0,
            next_refresh_ms: 0,
            next_input_ms: 0,
            refreshes: 0,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn into_target(self) -> D {
        self.target
    }

    /// Engine clock
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Refresh passes that drew at least one widget
    pub fn refreshes(&self) -> u32 {
        self.refreshes
    }

    fn poll_input(&mut self, source: &mut dyn PointerSource) -> Option<WidgetId> {
        let event = source.read_pointer();
        self.screen.pointer(event)
    }

    fn refresh(&mut self) -> Result<(), EngineError> {
        if !self.screen.is_dirty() {
            return Ok(());
        }
        match self.screen.render(&mut self.target) {
            Ok(_) => {
                self.refreshes = self.refreshes.wrapping_add(1);
                Ok(())
            }
            Err(e) => {
                // The panel may hold a partial frame
                self.screen.invalidate();
                Err(EngineError::Flush(e))
            }
        }
    }
}

impl<D> RenderEngine for ScreenEngine<D>
where
    D: DrawTarget<Color = Rgb565, Error = DriverError>,
{
    fn handle_timers(&mut self, pointer: Option<&mut dyn PointerSource>) -> Result<u32, EngineError> {
        let now = self.now_ms;

        let mut next_due = match pointer {
            Some(source) => {
                if now >= self.next_input_ms {
                    if let Some(_id) = self.poll_input(source) {
                        #[cfg(feature = "defmt")]
                        defmt::debug!("activated {:?}", _id);
                    }
                    self.next_input_ms = now + self.timers.input_period_ms as u64;
                }
                self.next_input_ms
            }
            None => u64::MAX,
        };

        let refresh = if now >= self.next_refresh_ms {
            self.next_refresh_ms = now + self.timers.refresh_period_ms as u64;
            self.refresh()
        } else {
            Ok(())
        };
        next_due = next_due.min(self.next_refresh_ms);
        refresh?;

        Ok(next_due.saturating_sub(now).min(u32::MAX as u64) as u32)
    }

    fn set_readout(&mut self, text: &str) -> Result<(), EngineError> {
        self.screen.set_readout(text)
    }

    fn tick_inc(&mut self, elapsed_ms: u32) {
        self.now_ms = self.now_ms.saturating_add(elapsed_ms as u64);
    }
}
