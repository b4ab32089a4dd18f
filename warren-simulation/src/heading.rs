use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use std::fmt;

/// Where a wandering rabbit gets its next heading and how long to keep it.
pub trait HeadingSource: Send + fmt::Debug {
    /// Radians in `[0, 2π)`.
    fn heading(&mut self) -> f64;

    /// Whole seconds in `[1, 10]`.
    fn countdown(&mut self) -> f64;
}

/// Uniform headings and countdowns from a seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct RandomHeadings {
    seed: u64,
    rng: StdRng,
}

impl RandomHeadings {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Picks a fresh seed. Read it back with [`RandomHeadings::seed`] to replay the run.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random::<u64>())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl HeadingSource for RandomHeadings {
    fn heading(&mut self) -> f64 {
        self.rng.gen_range(0.0..TAU)
    }

    fn countdown(&mut self) -> f64 {
        self.rng.gen_range(1..=10u32) as f64
    }
}

/// Replays fixed headings and countdowns, repeating the last of each once
/// the script runs out.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ScriptedHeadings {
    headings: Vec<f64>,
    countdowns: Vec<f64>,
    heading_draws: usize,
    countdown_draws: usize,
}

#[cfg(test)]
impl ScriptedHeadings {
    pub(crate) fn new(headings: &[f64], countdowns: &[f64]) -> Self {
        Self {
            headings: headings.to_vec(),
            countdowns: countdowns.to_vec(),
            heading_draws: 0,
            countdown_draws: 0,
        }
    }
}

#[cfg(test)]
impl HeadingSource for ScriptedHeadings {
    fn heading(&mut self) -> f64 {
        let i = self.heading_draws.min(self.headings.len() - 1);
        self.heading_draws += 1;
        self.headings[i]
    }

    fn countdown(&mut self) -> f64 {
        let i = self.countdown_draws.min(self.countdowns.len() - 1);
        self.countdown_draws += 1;
        self.countdowns[i]
    }
}
