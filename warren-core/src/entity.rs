use crate::plane::Position;
use serde::Serialize;
use std::fmt;

/// Capability set the drivers need from anything they simulate.
pub trait Entity: Send {
    /// Move forward by `dt` simulated seconds. `dt` must be positive.
    fn advance(&mut self, dt: f64);

    /// Snapshot of the current position.
    fn report(&self) -> Report;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RabbitKind {
    Regular,
    Albino,
}

impl RabbitKind {
    pub fn label(&self) -> &'static str {
        match self {
            RabbitKind::Regular => "Regular",
            RabbitKind::Albino => "Albino",
        }
    }
}

impl fmt::Display for RabbitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a rabbit is, and which kind of rabbit it is.
///
/// `Display` gives the stdout line. Coordinates use the shortest `f64` form
/// that round-trips, so a position prints as `403.9692620785908` rather than
/// rounded to six significant digits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Report {
    pub kind: RabbitKind,
    pub position: Position,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Rabbit Position: ({}, {})",
            self.kind, self.position.x, self.position.y
        )
    }
}

/// A report stamped with the tick that produced it.
///
/// `tick` is 1-based and `elapsed` is simulated seconds (`tick * dt`), which
/// is independent of how long the run actually took.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub elapsed: f64,
    pub report: Report,
}
