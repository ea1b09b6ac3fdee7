//! Demo counter
//!
//! A bounded value advanced once per render tick and pushed into the readout
//! field. Kept in fixed-point hundredths so the trajectory is exact.

use core::fmt::Write;

use crate::config::CounterConfig;

/// Readout text handed to the UI document
pub type Readout = heapless::String<16>;

/// Per-tick hook of the render loop
///
/// Returns new readout text when the document should be updated.
pub trait TickObserver {
    fn on_tick(&mut self) -> Option<Readout>;
}

/// Counter stepping from a start value, wrapping at a ceiling back to a floor
#[derive(Debug, Clone)]
pub struct DemoCounter {
    value: i32,
    config: CounterConfig,
}

impl DemoCounter {
    pub fn new(config: CounterConfig) -> Self {
        Self {
            value: config.start_centi,
            config,
        }
    }

    /// Current value in hundredths
    pub fn value_centi(&self) -> i32 {
        self.value
    }

    /// Step once and return the new value
    ///
    /// Reaching the ceiling (not only passing it) wraps to the floor.
    pub fn advance(&mut self) -> i32 {
        self.value = self.value.saturating_add(self.config.step_centi);
        if self.value >= self.config.ceiling_centi {
            self.value = self.config.floor_centi;
        }
        self.value
    }

    /// Format hundredths with two decimals ("3.24", "-0.50")
    pub fn format(centi: i32) -> Option<Readout> {
        let sign = if centi < 0 { "-" } else { "" };
        let abs = centi.unsigned_abs();
        let mut text = Readout::new();
        write!(text, "{}{}.{:02}", sign, abs / 100, abs % 100).ok()?;
        Some(text)
    }
}

impl TickObserver for DemoCounter {
    fn on_tick(&mut self) -> Option<Readout> {
        let value = self.advance();
        Self::format(value)
    }
}
