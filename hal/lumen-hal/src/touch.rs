//! Touch controller abstractions

use crate::error::DriverError;

/// One sample from a touch controller, in controller coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchSample {
    /// X of the first contact
    pub x: u16,
    /// Y of the first contact
    pub y: u16,
    /// Number of contact points (0 = released)
    pub points: u8,
}

/// Capacitive/resistive touch controller
///
/// Reads are split the way most controllers work: `read_data` pulls a
/// register snapshot over the bus, `coordinates` decodes the last snapshot.
pub trait TouchController {
    /// Refresh the cached sample from the controller
    ///
    /// Must complete in bounded time: it is called from the render engine's
    /// input sampling path.
    fn read_data(&mut self) -> Result<(), DriverError>;

    /// The sample captured by the last successful `read_data`
    fn coordinates(&self) -> TouchSample;
}

/// I2C bus configuration for the touch controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchBusConfig {
    /// Clock frequency in Hz
    pub frequency_hz: u32,
    /// Enable internal pull-ups on SDA/SCL
    pub pullups: bool,
}

impl Default for TouchBusConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl TouchBusConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self {
        frequency_hz: 100_000,
        pullups: true,
    };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self {
        frequency_hz: 400_000,
        pullups: true,
    };
}

/// Touch bus/controller construction layer
pub trait TouchPlatform {
    /// Initialized touch bus
    type Bus;
    /// Touch controller built over the bus
    type Touch: TouchController;

    /// Initialize the touch bus
    fn init_touch_bus(&mut self, config: &TouchBusConfig) -> Result<Self::Bus, DriverError>;

    /// Construct the touch controller over the bus
    fn new_touch(&mut self, bus: Self::Bus) -> Result<Self::Touch, (Self::Bus, DriverError)>;

    /// Free the touch bus
    fn free_touch_bus(&mut self, bus: Self::Bus);
}

impl<T: TouchPlatform + ?Sized> TouchPlatform for &mut T {
    type Bus = T::Bus;
    type Touch = T::Touch;

    fn init_touch_bus(&mut self, config: &TouchBusConfig) -> Result<Self::Bus, DriverError> {
        T::init_touch_bus(self, config)
    }

    fn new_touch(&mut self, bus: Self::Bus) -> Result<Self::Touch, (Self::Bus, DriverError)> {
        T::new_touch(self, bus)
    }

    fn free_touch_bus(&mut self, bus: Self::Bus) {
        T::free_touch_bus(self, bus)
    }
}

impl<T: TouchController + ?Sized> TouchController for &mut T {
    fn read_data(&mut self) -> Result<(), DriverError> {
        T::read_data(self)
    }

    fn coordinates(&self) -> TouchSample {
        T::coordinates(self)
    }
}
