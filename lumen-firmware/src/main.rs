//! Lumen - Touch Display Demo Firmware
//!
//! Firmware for the Waveshare RP2040 Touch LCD 1.69 board. Brings up the
//! ST7789V2 panel and the CST816S touch controller, then hands the UI to a
//! render loop and starts a low-priority heartbeat task.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use lumen_core::Bootstrap;
use lumen_display::{EngineTimers, ScreenEngine};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::board::{DisplayBoard, DisplayResources, TouchBoard, TouchResources};
use crate::launcher::RpLauncher;

mod board;
mod clock;
mod config;
mod launcher;
mod tasks;

/// Preempting executor for high-priority tasks
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

// Boards live forever so the pins they hold are never dropped
static DISPLAY: StaticCell<DisplayBoard> = StaticCell::new();
static TOUCH: StaticCell<TouchBoard> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Lumen firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config(p.FLASH);

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);

    let display = DISPLAY.init(DisplayBoard::new(
        DisplayResources {
            spi: p.SPI1,
            sck: p.PIN_10,
            mosi: p.PIN_11,
            dc: p.PIN_8,
            cs: p.PIN_9,
            rst: p.PIN_13,
            backlight: p.PIN_25,
        },
        config.display.backlight_active_high,
    ));
    let touch = TOUCH.init(TouchBoard::new(TouchResources {
        i2c: p.I2C1,
        sda: p.PIN_6,
        scl: p.PIN_7,
        rst: p.PIN_22,
    }));

    // Spare header pin, free on this board
    let heartbeat = Output::new(p.PIN_16, Level::Low);

    let mut launcher = RpLauncher::new(spawner, high_spawner, config.render, config.counter, heartbeat);

    let report = match Bootstrap::new(&config, display, touch).run(
        |panel| ScreenEngine::new(panel, EngineTimers::default()),
        &mut launcher,
    ) {
        Ok(report) => report,
        Err(e) => defmt::panic!("Boot failed: {}", e),
    };

    info!("Boot finished, touch {}", report.touch);
}
