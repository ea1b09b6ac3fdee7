//! Widget tree
//!
//! One fixed screen laid out for a 240x280 panel: title, numeric readout,
//! a switch and a button. Widgets are redrawn individually as they change.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{ContainsPoint, Rectangle};
use lumen_core::{EngineError, PointerEvent};

use crate::theme;
use crate::widget::{Button, Label, Switch};

/// Capacity of the readout text, matching the core's readout buffer
pub const READOUT_LEN: usize = 16;

const TITLE_LEN: usize = 24;

/// Widget identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetId {
    Title,
    Readout,
    Switch,
    Button,
}

impl WidgetId {
    /// Every widget, in drawing order
    pub const ALL: [WidgetId; 4] = [WidgetId::Title, WidgetId::Readout, WidgetId::Switch, WidgetId::Button];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Screen state with dirty tracking
#[derive(Clone)]
pub struct Screen {
    title: Label<TITLE_LEN>,
    readout: Label<READOUT_LEN>,
    switch: Switch,
    button: Button,
    /// One bit per widget
    dirty: u8,
    /// Clear and redraw everything on the next render
    full_redraw: bool,
    /// Widget holding the current press
    pressed: Option<WidgetId>,
    taps: u32,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create the screen; the first render draws everything
    pub fn new() -> Self {
        Self {
            title: Label::new(
                Rectangle::new(Point::new(0, 12), Size::new(240, 24)),
                theme::TITLE_FONT,
                "Hello World",
            ),
            readout: Label::new(
                Rectangle::new(Point::new(40, 54), Size::new(160, 32)),
                theme::READOUT_FONT,
                "",
            ),
            switch: Switch::new(Rectangle::new(Point::new(93, 113), Size::new(40, 20))),
            button: Button::new(Rectangle::new(Point::new(68, 180), Size::new(100, 50)), "Button"),
            dirty: 0,
            full_redraw: true,
            pressed: None,
            taps: 0,
        }
    }

    /// Current readout text
    pub fn readout(&self) -> &str {
        self.readout.text()
    }

    /// Replace the readout text, marking it dirty if it changed
    pub fn set_readout(&mut self, text: &str) -> Result<(), EngineError> {
        if self.readout.set_text(text)? {
            self.mark_dirty(WidgetId::Readout);
        }
        Ok(())
    }

    pub fn switch_on(&self) -> bool {
        self.switch.on
    }

    /// Completed button taps
    pub fn taps(&self) -> u32 {
        self.taps
    }

    /// Widget currently held down, if any
    pub fn pressed(&self) -> Option<WidgetId> {
        self.pressed
    }

    /// Screen area occupied by a widget
    pub fn bounds(&self, id: WidgetId) -> Rectangle {
        match id {
            WidgetId::Title => self.title.bounds,
            WidgetId::Readout => self.readout.bounds,
            WidgetId::Switch => self.switch.bounds,
            WidgetId::Button => self.button.bounds,
        }
    }

    pub fn mark_dirty(&mut self, id: WidgetId) {
        self.dirty |= id.bit();
    }

    /// Force a clear and full redraw on the next render
    pub fn invalidate(&mut self) {
        self.full_redraw = true;
    }

    /// Check if anything needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.full_redraw || self.dirty != 0
    }

    /// Interactive widget under a point
    pub fn hit(&self, point: Point) -> Option<WidgetId> {
        [WidgetId::Switch, WidgetId::Button]
            .into_iter()
            .find(|&id| self.bounds(id).contains(point))
    }

    /// Dispatch one pointer sample
    ///
    /// A press starts on the widget under the pointer. A release over the
    /// same widget activates it; a release elsewhere cancels. Returns the
    /// activated widget.
    pub fn pointer(&mut self, event: PointerEvent) -> Option<WidgetId> {
        let point = Point::new(event.x, event.y);
        match (event.pressed, self.pressed) {
            (true, None) => {
                let id = self.hit(point)?;
                self.pressed = Some(id);
                self.set_highlight(id, true);
                None
            }
            (false, Some(id)) => {
                self.pressed = None;
                self.set_highlight(id, false);
                if self.hit(point) != Some(id) {
                    return None;
                }
                self.activate(id);
                Some(id)
            }
            _ => None,
        }
    }

    fn set_highlight(&mut self, id: WidgetId, on: bool) {
        if id == WidgetId::Button {
            self.button.pressed = on;
            self.mark_dirty(id);
        }
    }

    fn activate(&mut self, id: WidgetId) {
        match id {
            WidgetId::Switch => {
                self.switch.toggle();
                self.mark_dirty(id);
            }
            WidgetId::Button => self.taps = self.taps.wrapping_add(1),
            WidgetId::Title | WidgetId::Readout => {}
        }
    }

    fn render_widget<D: DrawTarget<Color = Rgb565>>(&self, id: WidgetId, target: &mut D) -> Result<(), D::Error> {
        match id {
            WidgetId::Title => self.title.render(target),
            WidgetId::Readout => self.readout.render(target),
            WidgetId::Switch => self.switch.render(target),
            WidgetId::Button => self.button.render(target),
        }
    }

    /// Redraw what changed
    ///
    /// Returns the number of widgets drawn. A widget stays dirty until its
    /// draw succeeds.
    pub fn render<D: DrawTarget<Color = Rgb565>>(&mut self, target: &mut D) -> Result<usize, D::Error> {
        if self.full_redraw {
            target.clear(theme::BACKGROUND)?;
            self.dirty = WidgetId::ALL.iter().fold(0, |bits, id| bits | id.bit());
            self.full_redraw = false;
        }

        let mut drawn = 0;
        for id in WidgetId::ALL {
            if self.dirty & id.bit() != 0 {
                self.render_widget(id, target)?;
                self.dirty &= !id.bit();
                drawn += 1;
            }
        }
        Ok(drawn)
    }
}
