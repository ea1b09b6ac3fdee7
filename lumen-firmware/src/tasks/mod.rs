//! Embassy async tasks
//!
//! The render loop and the engine clock share the UI lock and run on the
//! thread-mode executor. The secondary task shares nothing and runs on
//! whichever executor its priority selects.

pub mod render;
pub mod secondary;
pub mod tick;

use lumen_core::RunFlag;

pub use render::render_task;
pub use secondary::secondary_task;
pub use tick::engine_tick_task;

/// Run flag watched by every task loop; never cleared on target
pub static RUN: RunFlag = RunFlag::new();
