//! Board-agnostic core logic for the Lumen display firmware
//!
//! This crate contains the logic that does not depend on a specific board:
//!
//! - Resource acquisition with reverse-order rollback
//! - Touch input bridge (controller sample to pointer event)
//! - The UI lock and the lock-protected UI document
//! - Render loop, engine clock actor and secondary task
//! - Bootstrap sequencing and task launch
//! - Configuration types and the error taxonomy
//!
//! # Testing
//!
//! Everything here runs on the host: `cargo test -p lumen-core`.
//! Tests run with `std` enabled (via `cfg_attr`), while firmware builds
//! are `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod acquire;
pub mod bootstrap;
pub mod config;
pub mod document;
pub mod error;
pub mod input;
pub mod render;
pub mod secondary;
pub mod sync;
pub mod traits;

#[cfg(test)]
mod testing;

pub use acquire::{acquire_display, acquire_touch, DisplayHandles};
pub use bootstrap::{BootReport, Bootstrap, TaskLauncher, TouchStatus};
pub use config::DeviceConfig;
pub use document::UiDocument;
pub use error::{BootError, EngineError, InitError, InitStage, LaunchError, TouchInitError};
pub use input::{CoordinateMap, InputBridge};
pub use render::{DemoCounter, Readout, RenderLoop, TickObserver, TickReport};
pub use secondary::SecondaryTask;
pub use sync::{UiGuard, UiLock};
pub use traits::{PointerEvent, PointerSource, RenderEngine, RunFlag, TaskClock};
