//! Input bridge
//!
//! Turns touch controller samples into pointer events for the render engine.
//! Polling is synchronous and runs from the engine's input sampling step, so
//! it relies on the controller's bounded read and never retries.

use lumen_hal::TouchController;

use crate::traits::{PointerEvent, PointerSource};

/// Controller-to-screen coordinate mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoordinateMap {
    /// Controller X range (exclusive)
    pub x_max: u16,
    /// Controller Y range (exclusive)
    pub y_max: u16,
    pub swap_xy: bool,
    pub mirror_x: bool,
    pub mirror_y: bool,
}

impl CoordinateMap {
    /// Identity mapping over the given range
    pub const fn identity(x_max: u16, y_max: u16) -> Self {
        Self {
            x_max,
            y_max,
            swap_xy: false,
            mirror_x: false,
            mirror_y: false,
        }
    }

    /// Map a raw controller point to screen coordinates
    ///
    /// Swapping happens first, so mirroring applies to screen axes. The
    /// result is clamped to the screen.
    pub fn apply(&self, x: u16, y: u16) -> (i32, i32) {
        let (mut x, mut y) = (x as i32, y as i32);
        let (mut w, mut h) = (self.x_max as i32, self.y_max as i32);

        if self.swap_xy {
            core::mem::swap(&mut x, &mut y);
            core::mem::swap(&mut w, &mut h);
        }

        let x = x.clamp(0, (w - 1).max(0));
        let y = y.clamp(0, (h - 1).max(0));

        let x = if self.mirror_x { (w - 1).max(0) - x } else { x };
        let y = if self.mirror_y { (h - 1).max(0) - y } else { y };

        (x, y)
    }
}

/// Touch-to-pointer adapter bound as the render engine's pointer source
pub struct InputBridge<T> {
    touch: T,
    map: CoordinateMap,
    last_x: i32,
    last_y: i32,
    dropped: u32,
}

impl<T: TouchController> InputBridge<T> {
    pub fn new(touch: T, map: CoordinateMap) -> Self {
        Self {
            touch,
            map,
            last_x: 0,
            last_y: 0,
            dropped: 0,
        }
    }

    /// Sample the controller once
    ///
    /// A failed read counts as no contact: the event is released at the last
    /// known position. Only a contact moves the last known position.
    pub fn poll(&mut self) -> PointerEvent {
        if let Err(e) = self.touch.read_data() {
            self.dropped = self.dropped.wrapping_add(1);
            trace!("touch sample dropped: {:?}", e);
            return PointerEvent::released(self.last_x, self.last_y);
        }

        let sample = self.touch.coordinates();
        if sample.points == 0 {
            return PointerEvent::released(self.last_x, self.last_y);
        }

        let (x, y) = self.map.apply(sample.x, sample.y);
        self.last_x = x;
        self.last_y = y;
        PointerEvent::pressed(x, y)
    }

    /// Samples lost to transport errors since creation
    pub fn dropped_samples(&self) -> u32 {
        self.dropped
    }

    /// Give the touch controller back
    pub fn into_inner(self) -> T {
        self.touch
    }
}

impl<T: TouchController> PointerSource for InputBridge<T> {
    fn read_pointer(&mut self) -> PointerEvent {
        self.poll()
    }
}
