//! Bootstrap sequencing
//!
//! Runs the fixed start-up order and hands the tasks to the scheduler:
//!
//! 1. Validate configuration
//! 2. Acquire the display (fatal on failure)
//! 3. Acquire touch (degraded mode on failure)
//! 4. Build the render engine over the panel and bind the input bridge
//! 5. Launch the render task, then the secondary task
//!
//! The caller does no further work after a successful run.

use lumen_hal::{DisplayPlatform, TouchPlatform};

use crate::acquire::{acquire_display, acquire_touch};
use crate::config::{DeviceConfig, TaskDescriptor};
use crate::document::UiDocument;
use crate::error::{BootError, InitStage, LaunchError, TouchInitError};
use crate::input::InputBridge;
use crate::traits::RenderEngine;

/// Scheduler seam used to start the two tasks
///
/// The launcher takes ownership of the document and wraps it in the UI lock
/// shared by the render task and the engine clock.
pub trait TaskLauncher<E, P> {
    /// Start the render loop over `document`
    fn launch_render(&mut self, descriptor: &TaskDescriptor, document: UiDocument<E, P>) -> Result<(), LaunchError>;

    /// Start the secondary task with the given sleep period
    fn launch_secondary(&mut self, descriptor: &TaskDescriptor, period_ms: u32) -> Result<(), LaunchError>;
}

/// Touch availability after boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchStatus {
    /// Pointer input is bound to the engine
    Active,
    /// Running without pointer input
    Degraded(TouchInitError),
}

/// Summary of a successful boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    pub touch: TouchStatus,
}

/// Start-up context: configuration plus the two hardware platforms
pub struct Bootstrap<'c, D, T> {
    config: &'c DeviceConfig,
    display: D,
    touch: T,
}

impl<'c, D: DisplayPlatform, T: TouchPlatform> Bootstrap<'c, D, T> {
    pub fn new(config: &'c DeviceConfig, display: D, touch: T) -> Self {
        Self {
            config,
            display,
            touch,
        }
    }

    /// Run the start-up sequence
    ///
    /// `make_engine` builds the render engine over the acquired panel.
    pub fn run<E, F, L>(mut self, make_engine: F, launcher: &mut L) -> Result<BootReport, BootError>
    where
        E: RenderEngine,
        F: FnOnce(D::Panel) -> E,
        L: TaskLauncher<E, InputBridge<T::Touch>>,
    {
        self.config.validate()?;

        let display = acquire_display(&mut self.display, &self.config.display)?;

        let (pointer, touch) = match acquire_touch(&mut self.touch, &self.config.touch) {
            Ok(controller) => {
                info!("touch ready");
                let bridge = InputBridge::new(controller, self.config.touch.coordinate_map());
                (Some(bridge), TouchStatus::Active)
            }
            Err(e) => {
                if e.stage == InitStage::TouchDisabled {
                    info!("touch disabled, running without pointer input");
                } else {
                    warn!("touch init failed at {:?}, running without pointer input", e.stage);
                }
                (None, TouchStatus::Degraded(e))
            }
        };

        let engine = make_engine(display.into_panel());
        let document = UiDocument::new(engine, pointer);

        let tasks = &self.config.tasks;
        launcher.launch_render(&tasks.render, document).map_err(|e| {
            error!("render task launch failed: {:?}", e);
            e
        })?;
        launcher
            .launch_secondary(&tasks.secondary, tasks.secondary_period_ms)
            .map_err(|e| {
                error!("secondary task launch failed: {:?}", e);
                e
            })?;

        info!("boot complete");
        Ok(BootReport { touch })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::error::InitError;
    use crate::testing::{MockDisplayPlatform, MockEngine, MockPanel, MockTouch, MockTouchPlatform, Op};
    use crate::traits::PointerEvent;
    use lumen_hal::DriverError;

    type Document = UiDocument<MockEngine, InputBridge<MockTouch>>;

    /// Launcher that keeps the document instead of spawning
    #[derive(Default)]
    struct RecordingLauncher {
        document: Option<Document>,
        launched: Vec<(&'static str, TaskDescriptor)>,
        secondary_period_ms: u32,
        fail_render: Option<LaunchError>,
    }

    impl TaskLauncher<MockEngine, InputBridge<MockTouch>> for RecordingLauncher {
        fn launch_render(&mut self, descriptor: &TaskDescriptor, document: Document) -> Result<(), LaunchError> {
            if let Some(e) = self.fail_render {
                return Err(e);
            }
            self.launched.push(("render", *descriptor));
            self.document = Some(document);
            Ok(())
        }

        fn launch_secondary(&mut self, descriptor: &TaskDescriptor, period_ms: u32) -> Result<(), LaunchError> {
            self.launched.push(("secondary", *descriptor));
            self.secondary_period_ms = period_ms;
            Ok(())
        }
    }

    fn engine(_panel: MockPanel) -> MockEngine {
        MockEngine::default()
    }

    #[test]
    fn test_boot_with_touch() {
        let config = DeviceConfig::default();
        let mut display = MockDisplayPlatform::new(None);
        let mut touch = MockTouchPlatform::new(None);
        let mut launcher = RecordingLauncher::default();

        let report = Bootstrap::new(&config, &mut display, &mut touch)
            .run(engine, &mut launcher)
            .unwrap();

        assert_eq!(report.touch, TouchStatus::Active);
        assert_eq!(
            launcher.launched,
            [("render", config.tasks.render), ("secondary", config.tasks.secondary)]
        );
        assert_eq!(launcher.secondary_period_ms, 500);

        // The bridge is bound: a step reads the pointer through it
        let mut doc = launcher.document.take().unwrap();
        assert!(doc.has_pointer());
        doc.step().unwrap();
        assert_eq!(doc.engine().pointer_reads, 1);
    }

    #[test]
    fn test_touch_failure_still_launches_render() {
        let config = DeviceConfig::default();
        let mut display = MockDisplayPlatform::new(None);
        let mut touch = MockTouchPlatform::new(Some(InitStage::TouchController));
        let mut launcher = RecordingLauncher::default();

        let report = Bootstrap::new(&config, &mut display, &mut touch)
            .run(engine, &mut launcher)
            .unwrap();

        assert_eq!(
            report.touch,
            TouchStatus::Degraded(TouchInitError {
                stage: InitStage::TouchController,
                cause: Some(DriverError::NotFound),
            })
        );
        assert_eq!(launcher.launched.len(), 2);
        assert!(touch.ops().contains(&Op::FreeTouchBus));

        let mut doc = launcher.document.take().unwrap();
        assert!(!doc.has_pointer());
        assert_eq!(doc.step(), Ok(10));
    }

    #[test]
    fn test_display_failure_is_fatal() {
        let config = DeviceConfig::default();
        let mut display = MockDisplayPlatform::new(Some(InitStage::PanelReset));
        let mut touch = MockTouchPlatform::new(None);
        let mut launcher = RecordingLauncher::default();

        let err = Bootstrap::new(&config, &mut display, &mut touch)
            .run(engine, &mut launcher)
            .unwrap_err();

        assert_eq!(
            err,
            BootError::Init(InitError::new(InitStage::PanelReset, DriverError::Bus))
        );
        // Nothing launched, touch never attempted
        assert!(launcher.launched.is_empty());
        assert!(touch.ops().is_empty());
    }

    #[test]
    fn test_invalid_config_acquires_nothing() {
        let mut config = DeviceConfig::default();
        config.render.engine_tick_ms = 0;
        let mut display = MockDisplayPlatform::new(None);
        let mut touch = MockTouchPlatform::new(None);
        let mut launcher = RecordingLauncher::default();

        let err = Bootstrap::new(&config, &mut display, &mut touch)
            .run(engine, &mut launcher)
            .unwrap_err();

        assert_eq!(err, BootError::Config(ConfigError::ZeroEngineTick));
        assert!(display.ops().is_empty());
    }

    #[test]
    fn test_launch_failure_is_fatal() {
        let config = DeviceConfig::default();
        let mut display = MockDisplayPlatform::new(None);
        let mut touch = MockTouchPlatform::new(None);
        let mut launcher = RecordingLauncher {
            fail_render: Some(LaunchError::NoCapacity),
            ..RecordingLauncher::default()
        };

        let err = Bootstrap::new(&config, &mut display, &mut touch)
            .run(engine, &mut launcher)
            .unwrap_err();

        assert_eq!(err, BootError::Launch(LaunchError::NoCapacity));
        assert!(launcher.launched.is_empty());
    }

    #[test]
    fn test_pointer_mapping_applied() {
        let mut config = DeviceConfig::default();
        config.touch.mirror_x = true;
        let mut display = MockDisplayPlatform::new(None);
        let mut touch = MockTouchPlatform::new(None);
        let mut launcher = RecordingLauncher::default();

        Bootstrap::new(&config, &mut display, &mut touch)
            .run(engine, &mut launcher)
            .unwrap();

        let mut doc = launcher.document.take().unwrap();
        let bridge = doc.pointer_mut().unwrap();
        assert_eq!(bridge.poll(), PointerEvent::pressed(239 - 12, 34));
    }
}
