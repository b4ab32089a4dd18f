//! The regular rabbit: runs in a straight line for a few seconds, then turns to
//! a fresh random heading.

use crate::heading::HeadingSource;
use log::debug;
use warren_core::{Entity, Plane, Position, RabbitKind, Report};

#[derive(Debug)]
pub struct WanderingRabbit {
    plane: Plane,
    position: Position,
    speed: f64,
    heading: f64,
    /// Seconds until the next heading change.
    countdown: f64,
    source: Box<dyn HeadingSource>,
}

impl WanderingRabbit {
    /// Draws the first heading and countdown from `source` straight away.
    pub fn new(
        plane: Plane,
        position: Position,
        speed: f64,
        mut source: Box<dyn HeadingSource>,
    ) -> Self {
        let heading = source.heading();
        let countdown = source.countdown();
        Self {
            plane,
            position,
            speed,
            heading,
            countdown,
            source,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn countdown(&self) -> f64 {
        self.countdown
    }

    fn change_heading(&mut self) {
        self.heading = self.source.heading();
        self.countdown = self.source.countdown();
        debug!(
            "regular rabbit turned to {:.3} rad for {}s at ({:.2}, {:.2})",
            self.heading, self.countdown, self.position.x, self.position.y
        );
    }
}

impl Entity for WanderingRabbit {
    fn advance(&mut self, dt: f64) {
        if self.countdown <= 0.0 {
            self.change_heading();
        }

        let moved = Position::new(
            self.position.x + self.speed * self.heading.cos() * dt,
            self.position.y + self.speed * self.heading.sin() * dt,
        );
        self.position = self.plane.wrap(moved);
        self.countdown -= dt;
    }

    fn report(&self) -> Report {
        Report {
            kind: RabbitKind::Regular,
            position: self.position,
        }
    }
}
