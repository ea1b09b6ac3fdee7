//! Secondary task

use defmt::*;
use embassy_rp::gpio::Output;
use lumen_core::SecondaryTask;

use super::RUN;
use crate::clock::EmbassyClock;

/// Secondary task - independent fixed-period loop toggling the heartbeat pin
#[embassy_executor::task]
pub async fn secondary_task(period_ms: u32, heartbeat: Output<'static>) {
    info!("Secondary task started, {} ms period", period_ms);

    let clock = EmbassyClock;
    let mut task = SecondaryTask::new(&clock, period_ms, &RUN).with_heartbeat(heartbeat);
    let iterations = task.run().await;

    warn!("Secondary task stopped after {} iterations", iterations);
}
