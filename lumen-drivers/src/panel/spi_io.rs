//! SPI panel transport
//!
//! 4-wire MIPI DBI framing: the D/C pin is low while the command byte is
//! clocked out and high for parameters and pixel data. Chip select frames
//! each command together with its payload.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use lumen_hal::{DriverError, PanelIo};

/// Pixels converted per SPI write
const CHUNK_PIXELS: usize = 32;

/// Panel transport over an SPI bus plus D/C and CS pins
pub struct SpiPanelIo<SPI, DC, CS> {
    spi: SPI,
    dc: DC,
    cs: CS,
}

impl<SPI, DC, CS> SpiPanelIo<SPI, DC, CS>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin,
{
    /// Create the transport; CS is driven inactive immediately
    pub fn new(spi: SPI, dc: DC, mut cs: CS) -> Result<Self, (SPI, DC, CS, DriverError)> {
        if cs.set_high().is_err() {
            return Err((spi, dc, cs, DriverError::Bus));
        }
        Ok(Self { spi, dc, cs })
    }

    /// Give the bus and pins back
    pub fn release(self) -> (SPI, DC, CS) {
        (self.spi, self.dc, self.cs)
    }

    /// Run `body` with CS asserted, deasserting it on every path
    fn framed<F>(&mut self, body: F) -> Result<(), DriverError>
    where
        F: FnOnce(&mut SPI, &mut DC) -> Result<(), DriverError>,
    {
        self.cs.set_low().map_err(|_| DriverError::Bus)?;
        let result = body(&mut self.spi, &mut self.dc).and_then(|()| self.spi.flush().map_err(|_| DriverError::Bus));
        let released = self.cs.set_high().map_err(|_| DriverError::Bus);
        result.and(released)
    }
}

fn send_command<SPI: SpiBus<u8>, DC: OutputPin>(spi: &mut SPI, dc: &mut DC, cmd: u8) -> Result<(), DriverError> {
    dc.set_low().map_err(|_| DriverError::Bus)?;
    spi.write(&[cmd]).map_err(|_| DriverError::Bus)?;
    // Wait for the command byte to leave before flipping D/C
    spi.flush().map_err(|_| DriverError::Bus)?;
    dc.set_high().map_err(|_| DriverError::Bus)
}

impl<SPI, DC, CS> PanelIo for SpiPanelIo<SPI, DC, CS>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin,
{
    fn command(&mut self, cmd: u8, params: &[u8]) -> Result<(), DriverError> {
        self.framed(|spi, dc| {
            send_command(spi, dc, cmd)?;
            if !params.is_empty() {
                spi.write(params).map_err(|_| DriverError::Bus)?;
            }
            Ok(())
        })
    }

    fn write_pixels(&mut self, cmd: u8, pixels: &[u16]) -> Result<(), DriverError> {
        self.framed(|spi, dc| {
            send_command(spi, dc, cmd)?;

            let mut buf = [0u8; CHUNK_PIXELS * 2];
            for chunk in pixels.chunks(CHUNK_PIXELS) {
                for (bytes, pixel) in buf.chunks_exact_mut(2).zip(chunk) {
                    bytes.copy_from_slice(&pixel.to_be_bytes());
                }
                spi.write(&buf[..chunk.len() * 2]).map_err(|_| DriverError::Bus)?;
            }
            Ok(())
        })
    }
}
