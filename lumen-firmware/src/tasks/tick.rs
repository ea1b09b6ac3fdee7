//! Engine clock task
//!
//! Advances the render engine's clock by the configured tick so its refresh
//! and input timers come due.

use defmt::*;
use lumen_core::render::drive_engine_clock;
use lumen_core::UiLock;

use super::RUN;
use crate::board::Document;
use crate::clock::EmbassyClock;

/// Engine clock task - enters the UI lock once per tick
#[embassy_executor::task]
pub async fn engine_tick_task(lock: &'static UiLock<Document>, period_ms: u32) {
    info!("Engine clock started, {} ms tick", period_ms);

    let advances = drive_engine_clock(lock, &EmbassyClock, period_ms, &RUN).await;

    warn!("Engine clock stopped after {} ticks", advances);
}
