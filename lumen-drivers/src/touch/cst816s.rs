//! CST816S capacitive touch controller
//!
//! Single-point controller on I2C. A touch report is five consecutive
//! registers starting at 0x02: finger count, then X and Y as 12-bit values
//! split across a high nibble register and a low byte register.

use embedded_hal::i2c::I2c;
use lumen_hal::{DriverError, TouchController, TouchSample};

/// Fixed 7-bit bus address
pub const ADDRESS: u8 = 0x15;

const REG_FINGER_NUM: u8 = 0x02;
const REG_CHIP_ID: u8 = 0xA7;

/// Chip IDs reported by the CST816 family (S, T, D)
const KNOWN_CHIP_IDS: [u8; 3] = [0xB4, 0xB5, 0xB6];

/// CST816S driver over a blocking I2C bus
pub struct Cst816s<I2C> {
    i2c: I2C,
    sample: TouchSample,
}

impl<I2C: I2c> Cst816s<I2C> {
    /// Probe the chip and build the driver
    ///
    /// Fails with `NotFound` when the chip does not identify as a CST816,
    /// and with `Bus` when the address does not answer.
    pub fn new(mut i2c: I2C) -> Result<Self, (I2C, DriverError)> {
        let mut id = [0u8; 1];
        if i2c.write_read(ADDRESS, &[REG_CHIP_ID], &mut id).is_err() {
            return Err((i2c, DriverError::Bus));
        }
        if !KNOWN_CHIP_IDS.contains(&id[0]) {
            return Err((i2c, DriverError::NotFound));
        }
        Ok(Self {
            i2c,
            sample: TouchSample::default(),
        })
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Decode a five-byte report starting at the finger count register
fn decode(report: &[u8; 5]) -> TouchSample {
    let x = ((report[1] as u16 & 0x0F) << 8) | report[2] as u16;
    let y = ((report[3] as u16 & 0x0F) << 8) | report[4] as u16;
    TouchSample {
        x,
        y,
        points: report[0],
    }
}

impl<I2C: I2c> TouchController for Cst816s<I2C> {
    fn read_data(&mut self) -> Result<(), DriverError> {
        let mut report = [0u8; 5];
        self.i2c
            .write_read(ADDRESS, &[REG_FINGER_NUM], &mut report)
            .map_err(|_| DriverError::Bus)?;
        self.sample = decode(&report);
        Ok(())
    }

    fn coordinates(&self) -> TouchSample {
        self.sample
    }
}
