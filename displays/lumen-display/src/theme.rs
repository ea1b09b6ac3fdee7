//! Colors and fonts shared by the widgets

use embedded_graphics::mono_font::{ascii, MonoFont};
use embedded_graphics::pixelcolor::Rgb565;

/// RGB888 hex literal, truncated to RGB565
const fn hex(rgb: u32) -> Rgb565 {
    let r = ((rgb >> 16) & 0xFF) as u8;
    let g = ((rgb >> 8) & 0xFF) as u8;
    let b = (rgb & 0xFF) as u8;
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

pub const BACKGROUND: Rgb565 = hex(0xFFFFFF);
pub const TEXT: Rgb565 = hex(0x000000);

pub const ACCENT: Rgb565 = hex(0x2195F6);
pub const ACCENT_PRESSED: Rgb565 = hex(0x1565C0);
pub const ACCENT_TEXT: Rgb565 = hex(0xFFFFFF);

pub const SWITCH_TRACK: Rgb565 = hex(0xE6E2E6);
pub const SWITCH_KNOB: Rgb565 = hex(0xFFFFFF);

pub const TITLE_FONT: &MonoFont<'static> = &ascii::FONT_9X18_BOLD;
pub const READOUT_FONT: &MonoFont<'static> = &ascii::FONT_10X20;
pub const BUTTON_FONT: &MonoFont<'static> = &ascii::FONT_7X13_BOLD;
