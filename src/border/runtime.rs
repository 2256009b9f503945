use crate::border::driver::{FrameDriver, TickOutcome};
use crate::border::messages::ExitReason;
use crate::border::snapshot::WindowSource;
use crate::border::surface::SegmentSurface;
use std::time::Instant;

/// Drive `driver` until a quit request has been applied and cleanup ran.
///
/// Every iteration services the host surface, runs one tick with the
/// measured wall-clock delta and then waits on the request queue for the
/// delay the tick asked for.
pub fn run<S, W>(driver: &mut FrameDriver<S>, source: &mut W) -> ExitReason
where
    S: SegmentSurface,
    W: WindowSource + ?Sized,
{
    let mut last_tick = Instant::now();
    loop {
        driver.pump_surface();
        let now = Instant::now();
        let elapsed = now.duration_since(last_tick);
        last_tick = now;

        match driver.tick(elapsed, source) {
            TickOutcome::Continue(delay) => driver.wait(delay),
            TickOutcome::Stop(reason) => {
                tracing::info!(?reason, "render loop stopped");
                return reason;
            }
        }
    }
}
