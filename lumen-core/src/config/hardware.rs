//! Hardware configuration types
//!
//! Panel geometry, bus clocks and touch coordinate mapping.

use lumen_hal::{BusConfig, ColorOrder, PanelConfig, TouchBusConfig, TransportConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::input::CoordinateMap;

/// Display panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Horizontal resolution in pixels
    pub width: u16,
    /// Vertical resolution in pixels
    pub height: u16,
    /// SPI pixel clock in Hz
    pub spi_frequency_hz: u32,
    /// Rows per partial draw buffer (sizes the largest bus transfer)
    pub draw_buffer_rows: u16,
    /// Mirror the image horizontally
    pub mirror_x: bool,
    /// Mirror the image vertically
    pub mirror_y: bool,
    /// Swap X and Y axes
    pub swap_xy: bool,
    /// Column offset between controller RAM and the glass
    pub gap_x: u16,
    /// Row offset between controller RAM and the glass
    pub gap_y: u16,
    /// Panel needs color inversion (IPS panels usually do)
    pub invert_colors: bool,
    /// Panel subpixels are BGR ordered
    pub bgr: bool,
    /// Backlight is on when its pin is high
    pub backlight_active_high: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 280,
            spi_frequency_hz: 40_000_000,
            draw_buffer_rows: 50,
            mirror_x: true,
            mirror_y: true,
            swap_xy: false,
            gap_x: 0,
            gap_y: 20,
            invert_colors: true,
            bgr: false,
            backlight_active_high: true,
        }
    }
}

impl DisplayConfig {
    /// Bus configuration derived from the panel geometry
    pub fn bus(&self) -> BusConfig {
        BusConfig {
            frequency_hz: self.spi_frequency_hz,
            // RGB565: two bytes per pixel
            max_transfer_bytes: self.width as u32 * self.draw_buffer_rows as u32 * 2,
        }
    }

    /// Panel transport configuration
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            frequency_hz: self.spi_frequency_hz,
            ..TransportConfig::default()
        }
    }

    /// Panel controller configuration
    pub fn panel(&self) -> PanelConfig {
        PanelConfig {
            width: self.width,
            height: self.height,
            color_order: if self.bgr { ColorOrder::Bgr } else { ColorOrder::Rgb },
            bits_per_pixel: 16,
        }
    }
}

/// Touch controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TouchConfig {
    /// Touch is fitted and should be brought up
    pub enabled: bool,
    /// I2C clock in Hz
    pub bus_frequency_hz: u32,
    /// Enable internal pull-ups on the touch bus
    pub pullups: bool,
    /// Controller X range (exclusive)
    pub x_max: u16,
    /// Controller Y range (exclusive)
    pub y_max: u16,
    /// Swap controller X and Y
    pub swap_xy: bool,
    /// Mirror controller X
    pub mirror_x: bool,
    /// Mirror controller Y
    pub mirror_y: bool,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bus_frequency_hz: 100_000,
            pullups: true,
            x_max: 240,
            y_max: 280,
            swap_xy: false,
            mirror_x: false,
            mirror_y: false,
        }
    }
}

impl TouchConfig {
    /// Touch bus configuration
    pub fn bus(&self) -> TouchBusConfig {
        TouchBusConfig {
            frequency_hz: self.bus_frequency_hz,
            pullups: self.pullups,
        }
    }

    /// Mapping from controller coordinates to pointer coordinates
    pub fn coordinate_map(&self) -> CoordinateMap {
        CoordinateMap {
            x_max: self.x_max,
            y_max: self.y_max,
            swap_xy: self.swap_xy,
            mirror_x: self.mirror_x,
            mirror_y: self.mirror_y,
        }
    }
}
