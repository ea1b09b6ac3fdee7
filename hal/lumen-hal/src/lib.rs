//! Lumen Hardware Abstraction Layer
//!
//! This crate defines the interfaces the display core needs from the
//! vendor-level collaborators: the bus/panel layer and the touch controller.
//! Chip-specific firmware implements the platform traits; panel and touch
//! drivers implement the device traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  lumen-core (acquire, input, render)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lumen-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ lumen-drivers │       │ lumen-firmware│
//! │ (ST7789, CST) │       │  (platforms)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`display::PanelIo`] - Command/pixel transport to a panel controller
//! - [`display::PanelDriver`] - Panel reset, init and orientation primitives
//! - [`display::DisplayPlatform`] - Bus, transport and panel construction
//! - [`touch::TouchController`] - Coordinate reads from a touch controller
//! - [`touch::TouchPlatform`] - Touch bus and controller construction

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod error;
pub mod touch;

// Re-export key traits at crate root for convenience
pub use display::{
    Area, BusConfig, ColorOrder, DisplayPlatform, PanelConfig, PanelDriver, PanelIo,
    TransportConfig,
};
pub use error::DriverError;
pub use touch::{TouchBusConfig, TouchController, TouchPlatform, TouchSample};
