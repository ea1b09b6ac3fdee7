//! ST7789 panel driver
//!
//! Drives an ST7789/ST7789V2 TFT controller through any [`PanelIo`]. Besides
//! the [`PanelDriver`] operations it implements `embedded-graphics`
//! [`DrawTarget`] so widgets can render straight to the glass.
//!
//! Controller RAM is 240x320; panels smaller than that sit at an offset
//! (the "gap") that `set_gap` records and every window write applies.

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{ContainsPoint, Rectangle};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use lumen_hal::{Area, ColorOrder, DriverError, PanelConfig, PanelDriver, PanelIo};

// ST7789 commands
const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const NORON: u8 = 0x13;
const INVOFF: u8 = 0x20;
const INVON: u8 = 0x21;
const DISPOFF: u8 = 0x28;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;
const RAMWRC: u8 = 0x3C;

// MADCTL flags
const MADCTL_MY: u8 = 0x80;
const MADCTL_MX: u8 = 0x40;
const MADCTL_MV: u8 = 0x20;
const MADCTL_BGR: u8 = 0x08;

/// COLMOD value for 16-bit RGB565
const COLMOD_RGB565: u8 = 0x55;

/// Pixels buffered per RAM write when streaming
const STREAM_PIXELS: usize = 64;

/// ST7789 panel over a command/pixel transport
pub struct St7789<IO, RST, D> {
    io: IO,
    rst: RST,
    delay: D,
    width: u16,
    height: u16,
    madctl: u8,
    gap_x: u16,
    gap_y: u16,
}

impl<IO, RST, D> St7789<IO, RST, D>
where
    IO: PanelIo,
    RST: OutputPin,
    D: DelayNs,
{
    pub fn new(io: IO, rst: RST, delay: D, config: &PanelConfig) -> Result<Self, (IO, RST, D, DriverError)> {
        if config.bits_per_pixel != 16 || config.width == 0 || config.height == 0 {
            return Err((io, rst, delay, DriverError::InvalidArgument));
        }

        let madctl = match config.color_order {
            ColorOrder::Rgb => 0,
            ColorOrder::Bgr => MADCTL_BGR,
        };

        Ok(Self {
            io,
            rst,
            delay,
            width: config.width,
            height: config.height,
            madctl,
            gap_x: 0,
            gap_y: 0,
        })
    }

    /// Give the transport, reset pin and delay back
    pub fn release(self) -> (IO, RST, D) {
        (self.io, self.rst, self.delay)
    }

    /// Visible size, accounting for an axis swap
    pub fn dimensions(&self) -> (u16, u16) {
        if self.madctl & MADCTL_MV != 0 {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    fn write_madctl(&mut self) -> Result<(), DriverError> {
        self.io.command(MADCTL, &[self.madctl])
    }

    fn set_flag(&mut self, flag: u8, on: bool) {
        if on {
            self.madctl |= flag;
        } else {
            self.madctl &= !flag;
        }
    }

    /// Set the RAM window for the given area, gap applied
    fn set_window(&mut self, area: &Area) -> Result<(), DriverError> {
        let x0 = area.x0.saturating_add(self.gap_x);
        let x1 = area.x1.saturating_add(self.gap_x);
        let y0 = area.y0.saturating_add(self.gap_y);
        let y1 = area.y1.saturating_add(self.gap_y);

        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        self.io.command(CASET, &[x0h, x0l, x1h, x1l])?;

        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.io.command(RASET, &[y0h, y0l, y1h, y1l])
    }

    fn contains(&self, area: &Area) -> bool {
        let (w, h) = self.dimensions();
        area.x1 < w && area.y1 < h
    }

    /// Stream colors into an on-screen area
    fn stream<I>(&mut self, area: Area, colors: I) -> Result<(), DriverError>
    where
        I: IntoIterator<Item = u16>,
    {
        self.set_window(&area)?;

        let mut buf = [0u16; STREAM_PIXELS];
        let mut remaining = area.pixel_count();
        let mut colors = colors.into_iter();
        let mut cmd = RAMWR;

        while remaining > 0 {
            let n = remaining.min(STREAM_PIXELS);
            for slot in buf[..n].iter_mut() {
                *slot = colors.next().unwrap_or(0);
            }
            self.io.write_pixels(cmd, &buf[..n])?;
            cmd = RAMWRC;
            remaining -= n;
        }
        Ok(())
    }
}

impl<IO, RST, D> PanelDriver for St7789<IO, RST, D>
where
    IO: PanelIo,
    RST: OutputPin,
    D: DelayNs,
{
    fn reset(&mut self) -> Result<(), DriverError> {
        self.rst.set_low().map_err(|_| DriverError::Bus)?;
        self.delay.delay_ms(10);
        self.rst.set_high().map_err(|_| DriverError::Bus)?;
        self.delay.delay_ms(120);
        Ok(())
    }

    fn init(&mut self) -> Result<(), DriverError> {
        self.io.command(SWRESET, &[])?;
        self.delay.delay_ms(150);

        self.io.command(SLPOUT, &[])?;
        self.delay.delay_ms(120);

        self.io.command(COLMOD, &[COLMOD_RGB565])?;
        self.write_madctl()?;
        self.io.command(NORON, &[])?;
        self.delay.delay_ms(10);
        Ok(())
    }

    fn mirror(&mut self, mirror_x: bool, mirror_y: bool) -> Result<(), DriverError> {
        self.set_flag(MADCTL_MX, mirror_x);
        self.set_flag(MADCTL_MY, mirror_y);
        self.write_madctl()
    }

    fn swap_xy(&mut self, swap: bool) -> Result<(), DriverError> {
        self.set_flag(MADCTL_MV, swap);
        self.write_madctl()
    }

    fn set_gap(&mut self, x: u16, y: u16) -> Result<(), DriverError> {
        self.gap_x = x;
        self.gap_y = y;
        Ok(())
    }

    fn invert_color(&mut self, invert: bool) -> Result<(), DriverError> {
        self.io.command(if invert { INVON } else { INVOFF }, &[])
    }

    fn display_on(&mut self, on: bool) -> Result<(), DriverError> {
        self.io.command(if on { DISPON } else { DISPOFF }, &[])
    }

    fn draw_bitmap(&mut self, area: Area, pixels: &[u16]) -> Result<(), DriverError> {
        if pixels.len() != area.pixel_count() || !self.contains(&area) {
            return Err(DriverError::InvalidArgument);
        }
        self.set_window(&area)?;
        self.io.write_pixels(RAMWR, pixels)
    }
}

impl<IO, RST, D> OriginDimensions for St7789<IO, RST, D>
where
    IO: PanelIo,
    RST: OutputPin,
    D: DelayNs,
{
    fn size(&self) -> Size {
        let (w, h) = self.dimensions();
        Size::new(w as u32, h as u32)
    }
}

/// Convert an on-screen rectangle to a panel area
fn to_area(rect: &Rectangle) -> Option<Area> {
    let x = u16::try_from(rect.top_left.x).ok()?;
    let y = u16::try_from(rect.top_left.y).ok()?;
    let w = u16::try_from(rect.size.width).ok()?;
    let h = u16::try_from(rect.size.height).ok()?;
    Area::from_origin(x, y, w, h)
}

impl<IO, RST, D> DrawTarget for St7789<IO, RST, D>
where
    IO: PanelIo,
    RST: OutputPin,
    D: DelayNs,
{
    type Color = Rgb565;
    type Error = DriverError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if !bounds.contains(point) {
                continue;
            }
            // Inside the bounding box, so both coordinates fit in u16
            let (x, y) = (point.x as u16, point.y as u16);
            let area = Area { x0: x, y0: y, x1: x, y1: y };
            self.draw_bitmap(area, &[color.into_storage()])?;
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let clipped = area.intersection(&self.bounding_box());
        if clipped == *area {
            if let Some(panel_area) = to_area(area) {
                return self.stream(panel_area, colors.into_iter().map(|c| c.into_storage()));
            }
            return Ok(());
        }

        // Partly off screen: fall back to per-pixel clipping
        self.draw_iter(
            area.points()
                .zip(colors)
                .map(|(point, color)| Pixel(point, color)),
        )
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let clipped = area.intersection(&self.bounding_box());
        match to_area(&clipped) {
            Some(panel_area) => self.stream(panel_area, core::iter::repeat(color.into_storage())),
            None => Ok(()),
        }
    }
}
