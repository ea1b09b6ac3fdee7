//! Collaborator traits owned by the core
//!
//! These traits define the interface between the core's tasks and the
//! render engine, the pointer input path and the scheduler's notion of time.

pub mod clock;
pub mod engine;

pub use clock::{RunFlag, TaskClock};
pub use engine::{PointerEvent, PointerSource, RenderEngine};
