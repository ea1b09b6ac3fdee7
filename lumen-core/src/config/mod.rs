//! Configuration types
//!
//! Board-agnostic configuration structures. Defaults reproduce the reference
//! board; firmware may override them with a postcard record stored in flash.

pub mod hardware;
#[cfg(feature = "serde")]
pub mod persist;
pub mod types;

pub use hardware::*;
#[cfg(feature = "serde")]
pub use persist::*;
pub use types::*;
