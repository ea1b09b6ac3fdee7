//! Render loop task

use defmt::*;
use lumen_core::config::{CounterConfig, RenderConfig};
use lumen_core::{DemoCounter, RenderLoop, UiLock};

use super::RUN;
use crate::board::Document;
use crate::clock::EmbassyClock;

/// Render task - steps the engine and publishes the demo counter
#[embassy_executor::task]
pub async fn render_task(lock: &'static UiLock<Document>, config: RenderConfig, counter: CounterConfig) {
    info!("Render task started");

    let clock = EmbassyClock;
    let mut render = RenderLoop::new(lock, &clock, DemoCounter::new(counter), config, &RUN);
    let ticks = render.run().await;

    warn!("Render loop stopped after {} ticks", ticks);
}
