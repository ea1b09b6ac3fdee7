//! Resource acquisition
//!
//! Brings up the display in a fixed order: backlight pin, bus, transport,
//! panel driver, panel bring-up sequence, backlight on. A failing step
//! releases everything acquired before it, newest first, and reports the
//! failing stage. Touch is acquired separately and never aborts boot.

use lumen_hal::{DisplayPlatform, DriverError, PanelDriver, TouchPlatform};

use crate::config::{DisplayConfig, TouchConfig};
use crate::error::{InitError, InitStage, TouchInitError};

/// Handles acquired so far, top of the stack first
///
/// Each variant owns the newest handle; the older ones are reachable through
/// the platform's release calls, so rollback can only walk in reverse.
enum Acquired<P: DisplayPlatform> {
    Bus(P::Bus),
    Transport(P::Transport),
    Panel(P::Panel),
}

impl<P: DisplayPlatform> Acquired<P> {
    fn rollback(self, platform: &mut P) {
        match self {
            Acquired::Panel(panel) => {
                warn!("releasing panel driver");
                let transport = platform.release_panel(panel);
                Acquired::<P>::Transport(transport).rollback(platform);
            }
            Acquired::Transport(transport) => {
                warn!("releasing panel transport");
                let bus = platform.release_transport(transport);
                Acquired::<P>::Bus(bus).rollback(platform);
            }
            Acquired::Bus(bus) => {
                warn!("freeing display bus");
                platform.free_bus(bus);
            }
        }
    }
}

/// Display handles owned by the render path after bring-up
pub struct DisplayHandles<Panel> {
    panel: Panel,
}

impl<Panel: PanelDriver> DisplayHandles<Panel> {
    pub fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panel
    }

    /// Hand the panel to the render engine
    pub fn into_panel(self) -> Panel {
        self.panel
    }

    /// Orderly teardown: backlight off, then panel, transport and bus
    pub fn release<P>(self, platform: &mut P)
    where
        P: DisplayPlatform<Panel = Panel>,
    {
        if let Err(e) = platform.set_backlight(false) {
            warn!("backlight off failed: {:?}", e);
        }
        Acquired::<P>::Panel(self.panel).rollback(platform);
    }
}

/// Acquire the display
///
/// On error every handle acquired before the failing stage has already been
/// released.
pub fn acquire_display<P: DisplayPlatform>(
    platform: &mut P,
    config: &DisplayConfig,
) -> Result<DisplayHandles<P::Panel>, InitError> {
    platform
        .configure_backlight()
        .map_err(|e| failed(InitStage::BacklightConfig, e))?;

    let bus = platform
        .init_bus(&config.bus())
        .map_err(|e| failed(InitStage::BusInit, e))?;
    debug!("display bus up at {} Hz", config.spi_frequency_hz);

    let transport = match platform.new_transport(bus, &config.transport()) {
        Ok(transport) => transport,
        Err((bus, e)) => {
            Acquired::<P>::Bus(bus).rollback(platform);
            return Err(failed(InitStage::Transport, e));
        }
    };
    debug!("panel transport ready");

    let mut panel = match platform.new_panel(transport, &config.panel()) {
        Ok(panel) => panel,
        Err((transport, e)) => {
            Acquired::<P>::Transport(transport).rollback(platform);
            return Err(failed(InitStage::Panel, e));
        }
    };
    debug!("panel driver created");

    let ready = bring_up(&mut panel, config).and_then(|()| {
        platform
            .set_backlight(true)
            .map_err(|e| failed(InitStage::BacklightEnable, e))
    });
    if let Err(e) = ready {
        Acquired::<P>::Panel(panel).rollback(platform);
        return Err(e);
    }

    info!("display ready: {}x{}", config.width, config.height);
    Ok(DisplayHandles { panel })
}

/// Panel reset, init and orientation sequence
fn bring_up<D: PanelDriver>(panel: &mut D, config: &DisplayConfig) -> Result<(), InitError> {
    panel.reset().map_err(|e| failed(InitStage::PanelReset, e))?;
    panel.init().map_err(|e| failed(InitStage::PanelInit, e))?;
    panel
        .mirror(config.mirror_x, config.mirror_y)
        .map_err(|e| failed(InitStage::PanelMirror, e))?;
    panel
        .swap_xy(config.swap_xy)
        .map_err(|e| failed(InitStage::PanelSwapXy, e))?;
    panel
        .display_on(true)
        .map_err(|e| failed(InitStage::PanelDisplayOn, e))?;
    panel
        .set_gap(config.gap_x, config.gap_y)
        .map_err(|e| failed(InitStage::PanelGap, e))?;
    panel
        .invert_color(config.invert_colors)
        .map_err(|e| failed(InitStage::PanelInvert, e))?;
    debug!("panel bring-up done");
    Ok(())
}

fn failed(stage: InitStage, cause: DriverError) -> InitError {
    error!("display init failed at {:?}: {:?}", stage, cause);
    InitError::new(stage, cause)
}

/// Acquire the touch controller, best effort
///
/// A failed controller construction frees the touch bus before returning.
pub fn acquire_touch<T: TouchPlatform>(
    platform: &mut T,
    config: &TouchConfig,
) -> Result<T::Touch, TouchInitError> {
    if !config.enabled {
        return Err(TouchInitError {
            stage: InitStage::TouchDisabled,
            cause: None,
        });
    }

    let bus = platform
        .init_touch_bus(&config.bus())
        .map_err(|e| TouchInitError {
            stage: InitStage::TouchBus,
            cause: Some(e),
        })?;

    match platform.new_touch(bus) {
        Ok(touch) => Ok(touch),
        Err((bus, e)) => {
            platform.free_touch_bus(bus);
            Err(TouchInitError {
                stage: InitStage::TouchController,
                cause: Some(e),
            })
        }
    }
}
