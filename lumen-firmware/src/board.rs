//! Waveshare RP2040 Touch LCD 1.69 platform
//!
//! Pin assignment:
//! - ST7789V2 on SPI1: SCK GPIO10, MOSI GPIO11, DC GPIO8, CS GPIO9,
//!   RST GPIO13, backlight GPIO25
//! - CST816S on I2C1: SDA GPIO6, SCL GPIO7, RST GPIO22
//! - Heartbeat output on header GPIO16, driven by the secondary task
//!
//! Each platform keeps the pins it has not handed out yet, and takes them
//! back when a layer built on top of them is released.

use defmt::*;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C1, PIN_10, PIN_11, PIN_13, PIN_22, PIN_25, PIN_6, PIN_7, PIN_8, PIN_9, SPI1};
use embassy_rp::spi::{self, Spi};
use embassy_rp::Peri;
use embassy_time::{block_for, Delay, Duration};
use lumen_core::{InputBridge, UiDocument};
use lumen_display::ScreenEngine;
use lumen_drivers::{Cst816s, SpiPanelIo, St7789};
use lumen_hal::{
    BusConfig, DisplayPlatform, DriverError, PanelConfig, TouchBusConfig, TouchPlatform, TransportConfig,
};

pub type DisplaySpi = Spi<'static, SPI1, spi::Blocking>;
pub type PanelTransport = SpiPanelIo<DisplaySpi, Output<'static>, Output<'static>>;
pub type Panel = St7789<PanelTransport, Output<'static>, Delay>;
pub type TouchI2c = I2c<'static, I2C1, i2c::Blocking>;
pub type Touch = Cst816s<TouchI2c>;

pub type Engine = ScreenEngine<Panel>;
pub type Pointer = InputBridge<Touch>;
pub type Document = UiDocument<Engine, Pointer>;

/// Display peripherals taken from `embassy_rp::init`
pub struct DisplayResources {
    pub spi: Peri<'static, SPI1>,
    pub sck: Peri<'static, PIN_10>,
    pub mosi: Peri<'static, PIN_11>,
    pub dc: Peri<'static, PIN_8>,
    pub cs: Peri<'static, PIN_9>,
    pub rst: Peri<'static, PIN_13>,
    pub backlight: Peri<'static, PIN_25>,
}

/// SPI bus, panel transport and panel construction
pub struct DisplayBoard {
    spi: Option<(Peri<'static, SPI1>, Peri<'static, PIN_10>, Peri<'static, PIN_11>)>,
    dc: Option<Output<'static>>,
    cs: Option<Output<'static>>,
    rst: Option<Output<'static>>,
    backlight_pin: Option<Peri<'static, PIN_25>>,
    backlight: Option<Output<'static>>,
    backlight_active_high: bool,
}

impl DisplayBoard {
    pub fn new(res: DisplayResources, backlight_active_high: bool) -> Self {
        Self {
            spi: Some((res.spi, res.sck, res.mosi)),
            dc: Some(Output::new(res.dc, Level::Low)),
            cs: Some(Output::new(res.cs, Level::High)),
            rst: Some(Output::new(res.rst, Level::High)),
            backlight_pin: Some(res.backlight),
            backlight: None,
            backlight_active_high,
        }
    }

    fn backlight_level(&self, on: bool) -> Level {
        if on == self.backlight_active_high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl DisplayPlatform for DisplayBoard {
    type Bus = DisplaySpi;
    type Transport = PanelTransport;
    type Panel = Panel;

    fn configure_backlight(&mut self) -> Result<(), DriverError> {
        let pin = self.backlight_pin.take().ok_or(DriverError::InvalidState)?;
        let off = self.backlight_level(false);
        self.backlight = Some(Output::new(pin, off));
        Ok(())
    }

    fn init_bus(&mut self, config: &BusConfig) -> Result<DisplaySpi, DriverError> {
        let (spi, sck, mosi) = self.spi.take().ok_or(DriverError::InvalidState)?;
        debug!(
            "SPI1 at {} Hz, largest transfer {} bytes",
            config.frequency_hz, config.max_transfer_bytes
        );

        // Polled writes, so no transfer size limit applies
        let mut spi_config = spi::Config::default();
        spi_config.frequency = config.frequency_hz;
        Ok(Spi::new_blocking_txonly(spi, sck, mosi, spi_config))
    }

    fn new_transport(
        &mut self,
        bus: DisplaySpi,
        config: &TransportConfig,
    ) -> Result<PanelTransport, (DisplaySpi, DriverError)> {
        // The bus is opened in mode 0 with 8-bit words
        if config.spi_mode != 0 || config.cmd_bits != 8 || config.param_bits != 8 {
            return Err((bus, DriverError::InvalidArgument));
        }

        let (dc, cs) = match (self.dc.take(), self.cs.take()) {
            (Some(dc), Some(cs)) => (dc, cs),
            (dc, cs) => {
                self.dc = dc;
                self.cs = cs;
                return Err((bus, DriverError::InvalidState));
            }
        };

        SpiPanelIo::new(bus, dc, cs).map_err(|(spi, dc, cs, e)| {
            self.dc = Some(dc);
            self.cs = Some(cs);
            (spi, e)
        })
    }

    fn new_panel(
        &mut self,
        transport: PanelTransport,
        config: &PanelConfig,
    ) -> Result<Panel, (PanelTransport, DriverError)> {
        let Some(rst) = self.rst.take() else {
            return Err((transport, DriverError::InvalidState));
        };

        St7789::new(transport, rst, Delay, config).map_err(|(io, rst, _, e)| {
            self.rst = Some(rst);
            (io, e)
        })
    }

    fn release_panel(&mut self, panel: Panel) -> PanelTransport {
        let (io, rst, _) = panel.release();
        self.rst = Some(rst);
        io
    }

    fn release_transport(&mut self, transport: PanelTransport) -> DisplaySpi {
        let (spi, dc, cs) = transport.release();
        self.dc = Some(dc);
        self.cs = Some(cs);
        spi
    }

    fn free_bus(&mut self, bus: DisplaySpi) {
        // Dropping the driver disconnects the pins; the bus cannot be reopened
        drop(bus);
        debug!("SPI1 freed");
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), DriverError> {
        let level = self.backlight_level(on);
        let pin = self.backlight.as_mut().ok_or(DriverError::InvalidState)?;
        pin.set_level(level);
        Ok(())
    }
}

/// Touch peripherals taken from `embassy_rp::init`
pub struct TouchResources {
    pub i2c: Peri<'static, I2C1>,
    pub sda: Peri<'static, PIN_6>,
    pub scl: Peri<'static, PIN_7>,
    pub rst: Peri<'static, PIN_22>,
}

/// I2C bus and touch controller construction
pub struct TouchBoard {
    i2c: Option<(Peri<'static, I2C1>, Peri<'static, PIN_7>, Peri<'static, PIN_6>)>,
    rst: Output<'static>,
}

impl TouchBoard {
    pub fn new(res: TouchResources) -> Self {
        Self {
            i2c: Some((res.i2c, res.scl, res.sda)),
            rst: Output::new(res.rst, Level::High),
        }
    }

    /// Pulse the controller reset and wait for it to boot
    fn reset_controller(&mut self) {
        self.rst.set_low();
        block_for(Duration::from_millis(10));
        self.rst.set_high();
        block_for(Duration::from_millis(50));
    }
}

impl TouchPlatform for TouchBoard {
    type Bus = TouchI2c;
    type Touch = Touch;

    fn init_touch_bus(&mut self, config: &TouchBusConfig) -> Result<TouchI2c, DriverError> {
        let (i2c, scl, sda) = self.i2c.take().ok_or(DriverError::InvalidState)?;
        debug!("I2C1 at {} Hz, pull-ups {}", config.frequency_hz, config.pullups);

        let mut i2c_config = i2c::Config::default();
        i2c_config.frequency = config.frequency_hz;
        i2c_config.sda_pullup = config.pullups;
        i2c_config.scl_pullup = config.pullups;
        Ok(I2c::new_blocking(i2c, scl, sda, i2c_config))
    }

    fn new_touch(&mut self, bus: TouchI2c) -> Result<Touch, (TouchI2c, DriverError)> {
        self.reset_controller();
        Cst816s::new(bus)
    }

    fn free_touch_bus(&mut self, bus: TouchI2c) {
        drop(bus);
        debug!("I2C1 freed");
    }
}
