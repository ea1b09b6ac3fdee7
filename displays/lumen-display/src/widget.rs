//! Widgets
//!
//! Each widget owns a fixed rectangle and repaints all of it, background
//! included, so any widget can be redrawn alone.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use heapless::String;
use lumen_core::EngineError;

use crate::theme;

/// Draw `text` centered in `bounds`, clipped to it
fn draw_centered<D>(target: &mut D, bounds: Rectangle, text: &str, font: &MonoFont<'_>, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let character_style = MonoTextStyle::new(font, color);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    Text::with_text_style(text, bounds.center(), character_style, text_style).draw(&mut target.clipped(&bounds))?;
    Ok(())
}

/// Centered single-line text
#[derive(Clone)]
pub struct Label<const N: usize> {
    pub bounds: Rectangle,
    font: &'static MonoFont<'static>,
    text: String<N>,
}

impl<const N: usize> Label<N> {
    /// Create a label; text beyond the capacity is cut off
    pub fn new(bounds: Rectangle, font: &'static MonoFont<'static>, text: &str) -> Self {
        let mut label = Self {
            bounds,
            font,
            text: String::new(),
        };
        for c in text.chars() {
            if label.text.push(c).is_err() {
                break;
            }
        }
        label
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text
    ///
    /// Returns whether the text changed. Text that does not fit is rejected
    /// and the previous text is kept.
    pub fn set_text(&mut self, text: &str) -> Result<bool, EngineError> {
        if self.text.as_str() == text {
            return Ok(false);
        }
        if text.len() > N {
            return Err(EngineError::TextOverflow);
        }
        self.text.clear();
        self.text.push_str(text).map_err(|()| EngineError::TextOverflow)?;
        Ok(true)
    }

    pub fn render<D: DrawTarget<Color = Rgb565>>(&self, target: &mut D) -> Result<(), D::Error> {
        self.bounds
            .into_styled(PrimitiveStyle::with_fill(theme::BACKGROUND))
            .draw(target)?;
        draw_centered(target, self.bounds, &self.text, self.font, theme::TEXT)
    }
}

/// Two-state toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switch {
    pub bounds: Rectangle,
    pub on: bool,
}

impl Switch {
    pub fn new(bounds: Rectangle) -> Self {
        Self { bounds, on: false }
    }

    pub fn toggle(&mut self) {
        self.on = !self.on;
    }

    pub fn render<D: DrawTarget<Color = Rgb565>>(&self, target: &mut D) -> Result<(), D::Error> {
        let radius = self.bounds.size.height / 2;
        let track = if self.on { theme::ACCENT } else { theme::SWITCH_TRACK };

        self.bounds
            .into_styled(PrimitiveStyle::with_fill(theme::BACKGROUND))
            .draw(target)?;
        RoundedRectangle::with_equal_corners(self.bounds, Size::new(radius, radius))
            .into_styled(PrimitiveStyle::with_fill(track))
            .draw(target)?;

        // Knob sits inside the track with a 2 px margin
        let diameter = self.bounds.size.height.saturating_sub(4);
        let x = if self.on {
            self.bounds.top_left.x + self.bounds.size.width as i32 - diameter as i32 - 2
        } else {
            self.bounds.top_left.x + 2
        };
        Circle::new(Point::new(x, self.bounds.top_left.y + 2), diameter)
            .into_styled(PrimitiveStyle::with_fill(theme::SWITCH_KNOB))
            .draw(target)
    }
}

/// Push button with a pressed highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub bounds: Rectangle,
    pub label: &'static str,
    pub pressed: bool,
}

impl Button {
    pub fn new(bounds: Rectangle, label: &'static str) -> Self {
        Self {
            bounds,
            label,
            pressed: false,
        }
    }

    pub fn render<D: DrawTarget<Color = Rgb565>>(&self, target: &mut D) -> Result<(), D::Error> {
        let fill = if self.pressed { theme::ACCENT_PRESSED } else { theme::ACCENT };

        self.bounds
            .into_styled(PrimitiveStyle::with_fill(theme::BACKGROUND))
            .draw(target)?;
        RoundedRectangle::with_equal_corners(self.bounds, Size::new(5, 5))
            .into_styled(PrimitiveStyle::with_fill(fill))
            .draw(target)?;
        draw_centered(target, self.bounds, self.label, theme::BUTTON_FONT, theme::ACCENT_TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rectangle {
        Rectangle::new(Point::new(10, 10), Size::new(80, 20))
    }

    #[test]
    fn test_label_truncates_on_construction() {
        let label: Label<4> = Label::new(rect(), theme::TITLE_FONT, "abcdef");
        assert_eq!(label.text(), "abcd");
    }

    #[test]
    fn test_set_text_reports_change() {
        let mut label: Label<8> = Label::new(rect(), theme::READOUT_FONT, "3.14");
        assert_eq!(label.set_text("3.14"), Ok(false));
        assert_eq!(label.set_text("3.24"), Ok(true));
        assert_eq!(label.text(), "3.24");
    }

    #[test]
    fn test_set_text_overflow_keeps_previous() {
        let mut label: Label<4> = Label::new(rect(), theme::READOUT_FONT, "0.00");
        assert_eq!(label.set_text("100.00"), Err(EngineError::TextOverflow));
        assert_eq!(label.text(), "0.00");
    }

    #[test]
    fn test_switch_toggle() {
        let mut switch = Switch::new(rect());
        assert!(!switch.on);
        switch.toggle();
        assert!(switch.on);
        switch.toggle();
        assert!(!switch.on);
    }
}
