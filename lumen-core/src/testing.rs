//! Host test doubles shared by the unit tests

use core::cell::{Cell, RefCell};
use std::rc::Rc;

use embassy_futures::yield_now;
use lumen_hal::{
    Area, BusConfig, DisplayPlatform, DriverError, PanelConfig, PanelDriver, TouchBusConfig,
    TouchController, TouchPlatform, TouchSample, TransportConfig,
};

use crate::error::{EngineError, InitStage};
use crate::traits::{PointerSource, RenderEngine, TaskClock};

/// Simulated scheduler clock
///
/// Time only moves while [`SimClock::run_for`] is polled alongside the code
/// under test, one millisecond per poll round. Once the run ends the clock is
/// halted and pending sleeps return immediately so loops can drain.
pub struct SimClock {
    now: Cell<u64>,
    halted: Cell<bool>,
    sleeps: RefCell<Vec<u32>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(0),
            halted: Cell::new(false),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Sleep without recording the request
    pub async fn sleep(&self, ms: u32) {
        let deadline = self.now.get() + ms as u64;
        while self.now.get() < deadline && !self.halted.get() {
            yield_now().await;
        }
    }

    /// Advance time until `until_ms`, then halt
    pub async fn run_for(&self, until_ms: u64) {
        while self.now.get() < until_ms {
            yield_now().await;
            self.now.set(self.now.get() + 1);
        }
        self.halt();
    }

    /// Stop time; every sleep from now on returns immediately
    pub fn halt(&self) {
        self.halted.set(true);
    }

    /// Durations passed to `sleep_ms`, in call order
    pub fn sleeps(&self) -> Vec<u32> {
        self.sleeps.borrow().clone()
    }
}

impl TaskClock for SimClock {
    async fn sleep_ms(&self, ms: u32) {
        self.sleeps.borrow_mut().push(ms);
        self.sleep(ms).await;
    }

    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Render engine double with a scripted step result
#[derive(Default)]
pub struct MockEngine {
    /// Results returned by successive steps; `Ok(10)` once exhausted
    pub script: Vec<Result<u32, EngineError>>,
    pub steps: usize,
    pub pointer_reads: usize,
    pub readouts: Vec<String>,
    pub elapsed_ms: u64,
}

impl MockEngine {
    pub fn scripted(script: Vec<Result<u32, EngineError>>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }
}

impl RenderEngine for MockEngine {
    fn handle_timers(&mut self, pointer: Option<&mut dyn PointerSource>) -> Result<u32, EngineError> {
        if let Some(source) = pointer {
            source.read_pointer();
            self.pointer_reads += 1;
        }
        let result = self.script.get(self.steps).copied().unwrap_or(Ok(10));
        self.steps += 1;
        result
    }

    fn set_readout(&mut self, text: &str) -> Result<(), EngineError> {
        self.readouts.push(String::from(text));
        Ok(())
    }

    fn tick_inc(&mut self, elapsed_ms: u32) {
        self.elapsed_ms += elapsed_ms as u64;
    }
}

/// Platform call recorded by the mock platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// A fallible bring-up step was attempted
    Step(InitStage),
    BacklightOff,
    ReleasePanel,
    ReleaseTransport,
    FreeBus,
    FreeTouchBus,
}

pub type Journal = Rc<RefCell<Vec<Op>>>;

fn attempt(journal: &Journal, fail_at: Option<InitStage>, stage: InitStage, cause: DriverError) -> Result<(), DriverError> {
    journal.borrow_mut().push(Op::Step(stage));
    if fail_at == Some(stage) {
        Err(cause)
    } else {
        Ok(())
    }
}

pub struct MockBus;
pub struct MockTransport;

/// Panel driver double that journals every call
pub struct MockPanel {
    journal: Journal,
    fail_at: Option<InitStage>,
    cause: DriverError,
}

impl PanelDriver for MockPanel {
    fn reset(&mut self) -> Result<(), DriverError> {
        attempt(&self.journal, self.fail_at, InitStage::PanelReset, self.cause)
    }

    fn init(&mut self) -> Result<(), DriverError> {
        attempt(&self.journal, self.fail_at, InitStage::PanelInit, self.cause)
    }

    fn mirror(&mut self, _mirror_x: bool, _mirror_y: bool) -> Result<(), DriverError> {
        attempt(&self.journal, self.fail_at, InitStage::PanelMirror, self.cause)
    }

    fn swap_xy(&mut self, _swap: bool) -> Result<(), DriverError> {
        attempt(&self.journal, self.fail_at, InitStage::PanelSwapXy, self.cause)
    }

    fn set_gap(&mut self, _x: u16, _y: u16) -> Result<(), DriverError> {
        attempt(&self.journal, self.fail_at, InitStage::PanelGap, self.cause)
    }

    fn invert_color(&mut self, _invert: bool) -> Result<(), DriverError> {
        attempt(&self.journal, self.fail_at, InitStage::PanelInvert, self.cause)
    }

    fn display_on(&mut self, _on: bool) -> Result<(), DriverError> {
        attempt(&self.journal, self.fail_at, InitStage::PanelDisplayOn, self.cause)
    }

    fn draw_bitmap(&mut self, _area: Area, _pixels: &[u16]) -> Result<(), DriverError> {
        Ok(())
    }
}

/// Display platform double failing at one chosen stage
pub struct MockDisplayPlatform {
    pub journal: Journal,
    pub fail_at: Option<InitStage>,
    pub cause: DriverError,
}

impl MockDisplayPlatform {
    pub fn new(fail_at: Option<InitStage>) -> Self {
        Self {
            journal: Journal::default(),
            fail_at,
            cause: DriverError::Bus,
        }
    }

    pub fn ops(&self) -> Vec<Op> {
        self.journal.borrow().clone()
    }
}

impl DisplayPlatform for MockDisplayPlatform {
    type Bus = MockBus;
    type Transport = MockTransport;
    type Panel = MockPanel;

    fn configure_backlight(&mut self) -> Result<(), DriverError> {
        attempt(&self.journal, self.fail_at, InitStage::BacklightConfig, self.cause)
    }

    fn init_bus(&mut self, _config: &BusConfig) -> Result<MockBus, DriverError> {
        attempt(&self.journal, self.fail_at, InitStage::BusInit, self.cause)?;
        Ok(MockBus)
    }

    fn new_transport(
        &mut self,
        bus: MockBus,
        _config: &TransportConfig,
    ) -> Result<MockTransport, (MockBus, DriverError)> {
        match attempt(&self.journal, self.fail_at, InitStage::Transport, self.cause) {
            Ok(()) => Ok(MockTransport),
            Err(e) => Err((bus, e)),
        }
    }

    fn new_panel(
        &mut self,
        transport: MockTransport,
        _config: &PanelConfig,
    ) -> Result<MockPanel, (MockTransport, DriverError)> {
        match attempt(&self.journal, self.fail_at, InitStage::Panel, self.cause) {
            Ok(()) => Ok(MockPanel {
                journal: self.journal.clone(),
                fail_at: self.fail_at,
                cause: self.cause,
            }),
            Err(e) => Err((transport, e)),
        }
    }

    fn release_panel(&mut self, _panel: MockPanel) -> MockTransport {
        self.journal.borrow_mut().push(Op::ReleasePanel);
        MockTransport
    }

    fn release_transport(&mut self, _transport: MockTransport) -> MockBus {
        self.journal.borrow_mut().push(Op::ReleaseTransport);
        MockBus
    }

    fn free_bus(&mut self, _bus: MockBus) {
        self.journal.borrow_mut().push(Op::FreeBus);
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), DriverError> {
        if on {
            attempt(&self.journal, self.fail_at, InitStage::BacklightEnable, self.cause)
        } else {
            self.journal.borrow_mut().push(Op::BacklightOff);
            Ok(())
        }
    }
}

/// Touch controller double reporting one fixed sample
pub struct MockTouch {
    pub sample: TouchSample,
}

impl TouchController for MockTouch {
    fn read_data(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn coordinates(&self) -> TouchSample {
        self.sample
    }
}

/// Touch platform double failing at one chosen stage
pub struct MockTouchPlatform {
    pub journal: Journal,
    pub fail_at: Option<InitStage>,
}

impl MockTouchPlatform {
    pub fn new(fail_at: Option<InitStage>) -> Self {
        Self {
            journal: Journal::default(),
            fail_at,
        }
    }

    pub fn ops(&self) -> Vec<Op> {
        self.journal.borrow().clone()
    }
}

impl TouchPlatform for MockTouchPlatform {
    type Bus = MockBus;
    type Touch = MockTouch;

    fn init_touch_bus(&mut self, _config: &TouchBusConfig) -> Result<MockBus, DriverError> {
        attempt(&self.journal, self.fail_at, InitStage::TouchBus, DriverError::Timeout)?;
        Ok(MockBus)
    }

    fn new_touch(&mut self, bus: MockBus) -> Result<MockTouch, (MockBus, DriverError)> {
        match attempt(&self.journal, self.fail_at, InitStage::TouchController, DriverError::NotFound) {
            Ok(()) => Ok(MockTouch {
                sample: TouchSample { x: 12, y: 34, points: 1 },
            }),
            Err(e) => Err((bus, e)),
        }
    }

    fn free_touch_bus(&mut self, _bus: MockBus) {
        self.journal.borrow_mut().push(Op::FreeTouchBus);
    }
}
