//! Task launcher over the embassy executors
//!
//! Priorities at or above [`INTERRUPT_PRIORITY`] go to the preempting
//! interrupt executor, lower ones to the thread-mode executor. The render
//! loop and the engine clock always share the thread-mode executor, since
//! they hold the UI document. The RP2040 build runs everything on core 0.

use defmt::*;
use embassy_executor::{SendSpawner, SpawnError, Spawner};
use embassy_rp::gpio::Output;
use lumen_core::config::{CoreAffinity, CounterConfig, RenderConfig, TaskDescriptor};
use lumen_core::{LaunchError, TaskLauncher, UiDocument, UiLock};
use static_cell::StaticCell;

use crate::board::{Document, Engine, Pointer};
use crate::tasks::{engine_tick_task, render_task, secondary_task};

/// Lowest priority that runs on the interrupt executor
pub const INTERRUPT_PRIORITY: u8 = 5;

/// UI lock around the document, shared by the render and engine clock tasks
static UI: StaticCell<UiLock<Document>> = StaticCell::new();

pub struct RpLauncher {
    thread: Spawner,
    interrupt: SendSpawner,
    render: RenderConfig,
    counter: CounterConfig,
    /// Handed to the secondary task when it launches
    heartbeat: Option<Output<'static>>,
}

impl RpLauncher {
    pub fn new(
        thread: Spawner,
        interrupt: SendSpawner,
        render: RenderConfig,
        counter: CounterConfig,
        heartbeat: Output<'static>,
    ) -> Self {
        Self {
            thread,
            interrupt,
            render,
            counter,
            heartbeat: Some(heartbeat),
        }
    }
}

/// Log what the executor cannot honor from a descriptor
fn check_descriptor(name: &str, descriptor: &TaskDescriptor) {
    if let CoreAffinity::Core(core) = descriptor.affinity {
        if core != 0 {
            warn!("{} task: core {} requested, running on core 0", name, core);
        }
    }
    // Embassy task futures are sized statically; the budget is informational
    debug!(
        "{} task: priority {}, stack budget {} bytes",
        name, descriptor.priority, descriptor.stack_bytes
    );
}

fn spawn_failed(e: SpawnError) -> LaunchError {
    error!("Task spawn failed: {:?}", e);
    LaunchError::NoCapacity
}

impl TaskLauncher<Engine, Pointer> for RpLauncher {
    fn launch_render(
        &mut self,
        descriptor: &TaskDescriptor,
        document: UiDocument<Engine, Pointer>,
    ) -> Result<(), LaunchError> {
        check_descriptor("render", descriptor);
        if descriptor.priority >= INTERRUPT_PRIORITY {
            warn!("render task priority {} runs in thread mode", descriptor.priority);
        }

        let lock: &'static UiLock<Document> = UI
            .try_init(UiLock::new(document))
            .map(|lock| &*lock)
            .ok_or(LaunchError::AlreadyRunning)?;

        self.thread
            .spawn(render_task(lock, self.render, self.counter))
            .map_err(spawn_failed)?;
        self.thread
            .spawn(engine_tick_task(lock, self.render.engine_tick_ms))
            .map_err(spawn_failed)?;
        Ok(())
    }

    fn launch_secondary(&mut self, descriptor: &TaskDescriptor, period_ms: u32) -> Result<(), LaunchError> {
        check_descriptor("secondary", descriptor);
        let heartbeat = self.heartbeat.take().ok_or(LaunchError::AlreadyRunning)?;

        let spawned = if descriptor.priority >= INTERRUPT_PRIORITY {
            self.interrupt.spawn(secondary_task(period_ms, heartbeat))
        } else {
            self.thread.spawn(secondary_task(period_ms, heartbeat))
        };
        spawned.map_err(spawn_failed)
    }
}
