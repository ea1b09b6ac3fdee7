//! Error taxonomy
//!
//! Only [`BootError`] ever reaches the process entry point. Touch failures
//! degrade the device, transient touch reads are swallowed by the input
//! bridge, and engine errors are logged by the render loop.

use lumen_hal::DriverError;

use crate::config::ConfigError;

/// Acquisition step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStage {
    /// Backlight pin direction
    BacklightConfig,
    /// Communication bus initialization
    BusInit,
    /// Panel transport construction
    Transport,
    /// Panel driver construction
    Panel,
    /// Panel reset
    PanelReset,
    /// Panel init sequence
    PanelInit,
    /// Panel mirroring
    PanelMirror,
    /// Panel axis swap
    PanelSwapXy,
    /// Panel display-on
    PanelDisplayOn,
    /// Panel gap offset
    PanelGap,
    /// Panel color inversion
    PanelInvert,
    /// Backlight enable
    BacklightEnable,
    /// Touch disabled by configuration
    TouchDisabled,
    /// Touch bus initialization
    TouchBus,
    /// Touch controller construction
    TouchController,
}

/// Fatal display acquisition failure
///
/// Every handle acquired before `stage` has been released by the time this
/// error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitError {
    pub stage: InitStage,
    pub cause: DriverError,
}

impl InitError {
    pub const fn new(stage: InitStage, cause: DriverError) -> Self {
        Self { stage, cause }
    }
}

/// Touch acquisition failure
///
/// Never fatal: the device runs without pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchInitError {
    pub stage: InitStage,
    /// `None` when touch was disabled rather than failing
    pub cause: Option<DriverError>,
}

/// Render engine failure reported by a single step or mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError {
    /// Flushing pixels to the panel failed
    Flush(DriverError),
    /// A widget was given text it cannot hold
    TextOverflow,
    /// Engine-internal invariant violated; the step was abandoned
    Internal,
}

/// Task launch failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LaunchError {
    /// Scheduler had no room for another task
    NoCapacity,
    /// The task was already running
    AlreadyRunning,
    /// Descriptor cannot be honored by this scheduler
    Unsupported,
}

/// Failure that stops bootstrap; the firmware aborts on any of these
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootError {
    /// Configuration failed validation
    Config(ConfigError),
    /// Display could not be brought up
    Init(InitError),
    /// A task could not be launched
    Launch(LaunchError),
}

impl From<ConfigError> for BootError {
    fn from(e: ConfigError) -> Self {
        BootError::Config(e)
    }
}

impl From<InitError> for BootError {
    fn from(e: InitError) -> Self {
        BootError::Init(e)
    }
}

impl From<LaunchError> for BootError {
    fn from(e: LaunchError) -> Self {
        BootError::Launch(e)
    }
}
