//! Device configuration types
//!
//! Task plan, render timing and demo counter settings, plus the top-level
//! [`DeviceConfig`] and its validation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::hardware::{DisplayConfig, TouchConfig};

/// CPU core a task may run on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoreAffinity {
    /// Scheduler chooses
    #[default]
    Any,
    /// Pinned to the given core
    Core(u8),
}

/// Launch parameters for an independently scheduled task
///
/// Fixed at launch and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskDescriptor {
    /// Stack budget in bytes
    pub stack_bytes: u32,
    /// Scheduling priority (higher preempts lower)
    pub priority: u8,
    pub affinity: CoreAffinity,
}

impl TaskDescriptor {
    pub const fn new(stack_bytes: u32, priority: u8) -> Self {
        Self {
            stack_bytes,
            priority,
            affinity: CoreAffinity::Any,
        }
    }
}

/// Descriptors for the tasks launched at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskPlan {
    /// Render Loop task
    pub render: TaskDescriptor,
    /// Secondary (heartbeat) task
    pub secondary: TaskDescriptor,
    /// Secondary task sleep period in milliseconds
    pub secondary_period_ms: u32,
}

impl Default for TaskPlan {
    fn default() -> Self {
        Self {
            render: TaskDescriptor::new(5 * 1024, 2),
            secondary: TaskDescriptor::new(2048, 11),
            secondary_period_ms: 500,
        }
    }
}

/// Render loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderConfig {
    /// Shortest sleep between ticks in milliseconds
    pub min_delay_ms: u32,
    /// Longest sleep between ticks in milliseconds
    pub max_delay_ms: u32,
    /// Engine clock period in milliseconds
    pub engine_tick_ms: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1,
            max_delay_ms: 500,
            engine_tick_ms: 5,
        }
    }
}

/// Demo counter trajectory, in hundredths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CounterConfig {
    pub start_centi: i32,
    pub step_centi: i32,
    /// Reaching this value wraps to the floor
    pub ceiling_centi: i32,
    pub floor_centi: i32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            start_centi: 314,
            step_centi: 10,
            ceiling_centi: 10_000,
            floor_centi: 0,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    pub display: DisplayConfig,
    pub touch: TouchConfig,
    pub render: RenderConfig,
    pub counter: CounterConfig,
    pub tasks: TaskPlan,
}

/// Configuration validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Minimum delay exceeds maximum delay
    EmptyDelayWindow,
    /// Minimum delay is zero, so a tick could sleep without yielding
    ZeroMinDelay,
    /// Engine tick period is zero
    ZeroEngineTick,
    /// Counter floor is not below its ceiling
    CounterRange,
    /// Counter step is not positive
    CounterStep,
    /// Counter start lies outside `[floor, ceiling)`
    CounterStart,
    /// Panel width or height is zero
    PanelSize,
    /// Draw buffer has no rows or more rows than the panel
    DrawBuffer,
    /// Secondary task period is zero
    SecondaryPeriod,
}

impl DeviceConfig {
    /// Check the configuration for values the tasks cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.min_delay_ms == 0 {
            return Err(ConfigError::ZeroMinDelay);
        }
        if self.render.min_delay_ms > self.render.max_delay_ms {
            return Err(ConfigError::EmptyDelayWindow);
        }
        if self.render.engine_tick_ms == 0 {
            return Err(ConfigError::ZeroEngineTick);
        }
        if self.counter.floor_centi >= self.counter.ceiling_centi {
            return Err(ConfigError::CounterRange);
        }
        if self.counter.step_centi <= 0 {
            return Err(ConfigError::CounterStep);
        }
        if self.counter.start_centi < self.counter.floor_centi
            || self.counter.start_centi >= self.counter.ceiling_centi
        {
            return Err(ConfigError::CounterStart);
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::PanelSize);
        }
        if self.display.draw_buffer_rows == 0 || self.display.draw_buffer_rows > self.display.height {
            return Err(ConfigError::DrawBuffer);
        }
        if self.tasks.secondary_period_ms == 0 {
            return Err(ConfigError::SecondaryPeriod);
        }
        Ok(())
    }
}
