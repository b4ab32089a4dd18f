use log::trace;
use std::time::Duration;

/// Optional wall-clock throttle applied after each tick.
///
/// Pacing only slows output down. It never changes the tick count or the
/// simulated `dt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    #[default]
    Unpaced,
    Fixed(Duration),
}

impl Pacing {
    /// One real-time pause per simulated step, `dt` seconds scaled to milliseconds.
    pub fn per_step(dt: f64) -> Self {
        Pacing::Fixed(Duration::from_millis((dt * 1000.0).round() as u64))
    }

    pub fn pause(&self) {
        if let Pacing::Fixed(duration) = self {
            trace!("pacing for {:?}", duration);
            spin_sleep::sleep(*duration);
        }
    }
}
