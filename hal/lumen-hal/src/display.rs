//! Display bus, transport and panel abstractions
//!
//! Acquisition is layered: a bus is initialized, a panel transport is
//! built over the bus, and a panel driver is built over the transport.
//! Each layer takes ownership of the one below it, and each release hands
//! the lower layer back, so a handle cannot be touched after it is released.

use crate::error::DriverError;

/// SPI bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Clock frequency in Hz
    pub frequency_hz: u32,
    /// Largest single transfer the bus must support, in bytes
    pub max_transfer_bytes: u32,
}

/// Panel transport configuration (command/data framing over the bus)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportConfig {
    /// Pixel clock in Hz
    pub frequency_hz: u32,
    /// SPI mode (0-3)
    pub spi_mode: u8,
    /// Bits per command word
    pub cmd_bits: u8,
    /// Bits per parameter word
    pub param_bits: u8,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 40_000_000,
            spi_mode: 0,
            cmd_bits: 8,
            param_bits: 8,
        }
    }
}

/// Subpixel order on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorOrder {
    Rgb,
    Bgr,
}

/// Panel controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// Horizontal resolution in pixels
    pub width: u16,
    /// Vertical resolution in pixels
    pub height: u16,
    /// Subpixel order
    pub color_order: ColorOrder,
    /// Bits per pixel on the wire (16 = RGB565)
    pub bits_per_pixel: u8,
}

/// Inclusive pixel rectangle in panel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Area {
    /// Create an area from a top-left corner and a size
    ///
    /// Returns `None` for an empty size.
    pub fn from_origin(x: u16, y: u16, width: u16, height: u16) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            x0: x,
            y0: y,
            x1: x.checked_add(width - 1)?,
            y1: y.checked_add(height - 1)?,
        })
    }

    /// Number of pixels covered
    pub fn pixel_count(&self) -> usize {
        (self.x1 - self.x0 + 1) as usize * (self.y1 - self.y0 + 1) as usize
    }
}

/// Panel transport (command/parameter framing)
///
/// Implemented over SPI with a data/command line, or any other bus a
/// panel controller understands.
pub trait PanelIo {
    /// Send a command followed by its parameter bytes
    fn command(&mut self, cmd: u8, params: &[u8]) -> Result<(), DriverError>;

    /// Send a memory-write command followed by RGB565 pixel data
    fn write_pixels(&mut self, cmd: u8, pixels: &[u16]) -> Result<(), DriverError>;
}

/// Panel controller primitives
///
/// Every operation is independently fallible; the caller decides whether a
/// failure aborts bring-up.
pub trait PanelDriver {
    /// Hardware (or software) reset of the controller
    fn reset(&mut self) -> Result<(), DriverError>;

    /// Run the controller initialization sequence
    fn init(&mut self) -> Result<(), DriverError>;

    /// Mirror the image along the X and/or Y axis
    fn mirror(&mut self, mirror_x: bool, mirror_y: bool) -> Result<(), DriverError>;

    /// Swap the X and Y axes
    fn swap_xy(&mut self, swap: bool) -> Result<(), DriverError>;

    /// Offset between panel RAM and the visible glass
    fn set_gap(&mut self, x: u16, y: u16) -> Result<(), DriverError>;

    /// Invert pixel colors
    fn invert_color(&mut self, invert: bool) -> Result<(), DriverError>;

    /// Turn the display output on or off
    fn display_on(&mut self, on: bool) -> Result<(), DriverError>;

    /// Write RGB565 pixels into an area
    ///
    /// `pixels.len()` must equal `area.pixel_count()`.
    fn draw_bitmap(&mut self, area: Area, pixels: &[u16]) -> Result<(), DriverError>;
}

/// Display bus/panel construction layer
///
/// This is the vendor driver boundary. Construction steps consume the layer
/// below and return it alongside the error on failure; release steps return
/// the layer below so it can be released next.
pub trait DisplayPlatform {
    /// Initialized communication bus
    type Bus;
    /// Panel transport built over the bus
    type Transport;
    /// Panel driver built over the transport
    type Panel: PanelDriver;

    /// Configure the backlight pin as an output
    fn configure_backlight(&mut self) -> Result<(), DriverError>;

    /// Initialize the communication bus
    fn init_bus(&mut self, config: &BusConfig) -> Result<Self::Bus, DriverError>;

    /// Construct the panel transport over the bus
    fn new_transport(
        &mut self,
        bus: Self::Bus,
        config: &TransportConfig,
    ) -> Result<Self::Transport, (Self::Bus, DriverError)>;

    /// Construct the panel driver over the transport
    fn new_panel(
        &mut self,
        transport: Self::Transport,
        config: &PanelConfig,
    ) -> Result<Self::Panel, (Self::Transport, DriverError)>;

    /// Delete the panel driver, returning its transport
    fn release_panel(&mut self, panel: Self::Panel) -> Self::Transport;

    /// Delete the transport, returning its bus
    fn release_transport(&mut self, transport: Self::Transport) -> Self::Bus;

    /// Free the bus
    fn free_bus(&mut self, bus: Self::Bus);

    /// Drive the backlight pin to its on or off level
    fn set_backlight(&mut self, on: bool) -> Result<(), DriverError>;
}

impl<T: DisplayPlatform + ?Sized> DisplayPlatform for &mut T {
    type Bus = T::Bus;
    type Transport = T::Transport;
    type Panel = T::Panel;

    fn configure_backlight(&mut self) -> Result<(), DriverError> {
        T::configure_backlight(self)
    }

    fn init_bus(&mut self, config: &BusConfig) -> Result<Self::Bus, DriverError> {
        T::init_bus(self, config)
    }

    fn new_transport(
        &mut self,
        bus: Self::Bus,
        config: &TransportConfig,
    ) -> Result<Self::Transport, (Self::Bus, DriverError)> {
        T::new_transport(self, bus, config)
    }

    fn new_panel(
        &mut self,
        transport: Self::Transport,
        config: &PanelConfig,
    ) -> Result<Self::Panel, (Self::Transport, DriverError)> {
        T::new_panel(self, transport, config)
    }

    fn release_panel(&mut self, panel: Self::Panel) -> Self::Transport {
        T::release_panel(self, panel)
    }

    fn release_transport(&mut self, transport: Self::Transport) -> Self::Bus {
        T::release_transport(self, transport)
    }

    fn free_bus(&mut self, bus: Self::Bus) {
        T::free_bus(self, bus)
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), DriverError> {
        T::set_backlight(self, on)
    }
}
