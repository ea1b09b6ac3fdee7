//! Display panel drivers

mod spi_io;
mod st7789;

pub use spi_io::SpiPanelIo;
pub use st7789::St7789;
