//! Hardware driver implementations
//!
//! Concrete collaborators for the traits in lumen-hal, written against
//! `embedded-hal` 1.0 so they run on any board:
//!
//! - SPI panel transport (command/parameter/pixel framing over SPI + D/C)
//! - ST7789 panel driver, also usable as an `embedded-graphics` draw target
//! - CST816S capacitive touch controller over I2C

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod panel;
pub mod touch;

pub use panel::{SpiPanelIo, St7789};
pub use touch::Cst816s;
