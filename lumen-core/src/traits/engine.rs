//! Render engine and pointer input traits

use crate::error::EngineError;

/// Pointer state handed to the render engine
///
/// Produced by one poll and consumed by at most one engine dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerEvent {
    pub x: i32,
    pub y: i32,
    pub pressed: bool,
}

impl PointerEvent {
    /// Released pointer at the given position
    pub const fn released(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            pressed: false,
        }
    }

    /// Pressed pointer at the given position
    pub const fn pressed(x: i32, y: i32) -> Self {
        Self { x, y, pressed: true }
    }
}

/// Pointer input callback
///
/// The render engine calls this from its input sampling step. It runs while
/// the UI lock is held, so implementations must not block indefinitely.
pub trait PointerSource {
    /// Sample the pointer once
    fn read_pointer(&mut self) -> PointerEvent;
}

/// Render engine (widget tree, timers, animations, input dispatch)
///
/// The engine is not thread-safe: every call happens with the UI lock held.
pub trait RenderEngine {
    /// Run one step of timers, animations and event dispatch
    ///
    /// `pointer` is the bound pointer source, absent when the device runs
    /// without touch. Returns the suggested delay before the next step, in
    /// milliseconds.
    fn handle_timers(&mut self, pointer: Option<&mut dyn PointerSource>) -> Result<u32, EngineError>;

    /// Replace the text of the numeric readout field
    fn set_readout(&mut self, text: &str) -> Result<(), EngineError>;

    /// Advance the engine's internal clock
    fn tick_inc(&mut self, elapsed_ms: u32);
}
