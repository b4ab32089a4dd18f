/// Ratios this close to a whole number count as that number, so `20.0 / 0.1`
/// gives 200 ticks rather than 201 from accumulated rounding.
const TICK_TOLERANCE: f64 = 1e-9;

/// Logical clock for a run: a fixed step and how many of them to take.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickClock {
    dt: f64,
    ticks: u64,
}

impl TickClock {
    /// Clock covering `simulation_time` seconds in steps of `dt`, i.e.
    /// `ceil(simulation_time / dt)` ticks.
    ///
    /// `dt` must be positive; config validation guarantees it.
    pub fn new(simulation_time: f64, dt: f64) -> Self {
        let ratio = simulation_time / dt;
        let nearest = ratio.round();
        let ticks = if (ratio - nearest).abs() < TICK_TOLERANCE {
            nearest
        } else {
            ratio.ceil()
        };
        Self {
            dt,
            ticks: ticks.max(0.0) as u64,
        }
    }

    pub fn with_ticks(dt: f64, ticks: u64) -> Self {
        Self { dt, ticks }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds at the end of `tick` (1-based).
    pub fn elapsed(&self, tick: u64) -> f64 {
        tick as f64 * self.dt
    }

    /// 1-based tick indices for the whole run.
    pub fn iter(&self) -> impl Iterator<Item = u64> {
        1..=self.ticks
    }
}
