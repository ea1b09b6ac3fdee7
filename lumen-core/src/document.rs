//! UI document
//!
//! The render engine together with the pointer source bound to it. This is
//! the single value behind the UI lock; nothing reaches the engine except
//! through a [`crate::UiGuard`] over a document.

use crate::error::EngineError;
use crate::traits::{PointerSource, RenderEngine};

/// Render engine state plus its optional pointer source
///
/// The pointer source is absent when the device runs in degraded mode
/// (touch unavailable).
pub struct UiDocument<E, P> {
    engine: E,
    pointer: Option<P>,
}

impl<E: RenderEngine, P: PointerSource> UiDocument<E, P> {
    pub fn new(engine: E, pointer: Option<P>) -> Self {
        Self { engine, pointer }
    }

    /// Run one engine step with the bound pointer source
    ///
    /// Returns the engine's suggested delay before the next step.
    pub fn step(&mut self) -> Result<u32, EngineError> {
        let pointer = self.pointer.as_mut().map(|p| p as &mut dyn PointerSource);
        self.engine.handle_timers(pointer)
    }

    /// Replace the readout text
    pub fn set_readout(&mut self, text: &str) -> Result<(), EngineError> {
        self.engine.set_readout(text)
    }

    /// Whether a pointer source is bound
    pub fn has_pointer(&self) -> bool {
        self.pointer.is_some()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn pointer(&self) -> Option<&P> {
        self.pointer.as_ref()
    }

    pub fn pointer_mut(&mut self) -> Option<&mut P> {
        self.pointer.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockEngine;
    use crate::traits::PointerEvent;

    struct CountingSource(usize);

    impl PointerSource for CountingSource {
        fn read_pointer(&mut self) -> PointerEvent {
            self.0 += 1;
            PointerEvent::released(0, 0)
        }
    }

    #[test]
    fn test_step_passes_bound_source() {
        let mut doc = UiDocument::new(MockEngine::default(), Some(CountingSource(0)));
        assert_eq!(doc.step(), Ok(10));
        assert_eq!(doc.engine().pointer_reads, 1);
        assert_eq!(doc.pointer().map(|p| p.0), Some(1));
    }

    #[test]
    fn test_step_without_touch() {
        let mut doc: UiDocument<_, CountingSource> = UiDocument::new(MockEngine::default(), None);
        assert!(!doc.has_pointer());
        assert_eq!(doc.step(), Ok(10));
        assert_eq!(doc.engine().pointer_reads, 0);
    }

    #[test]
    fn test_set_readout_reaches_engine() {
        let mut doc: UiDocument<_, CountingSource> = UiDocument::new(MockEngine::default(), None);
        doc.set_readout("3.24").unwrap();
        assert_eq!(doc.engine().readouts, ["3.24"]);
    }
}
