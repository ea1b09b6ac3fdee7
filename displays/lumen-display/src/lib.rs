//! Widget screen and render engine for Lumen
//!
//! This crate provides:
//! - `Label`, `Switch` and `Button` widgets drawn with `embedded-graphics`
//! - `Screen`, the fixed widget tree with per-widget dirty tracking
//! - `ScreenEngine`, the `RenderEngine` the render loop drives
//!
//! # Architecture
//!
//! The engine owns its draw target. Each `handle_timers` call runs whichever
//! of its two timers are due:
//!
//! - **Input**: samples the pointer source once and dispatches press and
//!   release to the widget under the pointer.
//! - **Refresh**: redraws dirty widgets, or the whole screen after a failed
//!   or first refresh.
//!
//! Timers run on the engine clock, which only moves through `tick_inc`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod engine;
pub mod screen;
pub mod theme;
pub mod widget;

pub use engine::{EngineTimers, ScreenEngine};
pub use screen::{Screen, WidgetId, READOUT_LEN};
pub use widget::{Button, Label, Switch};
