//! Configuration loading
//!
//! Reads the configuration record from the last flash sector. An erased,
//! corrupt, foreign-version or invalid record falls back to the built-in
//! defaults.

use defmt::*;
use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use lumen_core::config::{ConfigRecord, RecordError, MAX_RECORD_SIZE};
use lumen_core::DeviceConfig;

/// 2 MiB W25Q16 on the board
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Offset of the configuration sector, excluded from the program image
pub const CONFIG_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

/// Load the device configuration from flash or fall back to defaults
pub fn load_config(flash: Peri<'static, FLASH>) -> DeviceConfig {
    let mut flash = Flash::<_, Blocking, FLASH_SIZE>::new_blocking(flash);
    let mut record = [0u8; MAX_RECORD_SIZE];

    if let Err(e) = flash.blocking_read(CONFIG_OFFSET, &mut record) {
        warn!("Config sector read failed: {:?}, using defaults", e);
        return DeviceConfig::default();
    }

    match ConfigRecord::decode(&record) {
        Ok(config) => {
            info!("Loaded configuration from flash");
            log_config_summary(&config);
            config
        }
        Err(RecordError::Erased) => {
            info!("No configuration in flash, using defaults");
            DeviceConfig::default()
        }
        Err(e) => {
            warn!("Stored configuration rejected: {:?}, using defaults", e);
            DeviceConfig::default()
        }
    }
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &DeviceConfig) {
    debug!(
        "  panel {}x{}, SPI {} Hz, {} draw rows",
        config.display.width,
        config.display.height,
        config.display.spi_frequency_hz,
        config.display.draw_buffer_rows
    );
    debug!("  touch enabled: {}", config.touch.enabled);
    debug!(
        "  render delay [{}, {}] ms, engine tick {} ms",
        config.render.min_delay_ms, config.render.max_delay_ms, config.render.engine_tick_ms
    );
}
