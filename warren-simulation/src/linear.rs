//! The albino rabbit: runs along the horizontal centre line forever.

use warren_core::{Entity, Plane, Position, RabbitKind, Report};

#[derive(Debug, Clone)]
pub struct LinearRabbit {
    plane: Plane,
    x: f64,
    speed: f64,
}

impl LinearRabbit {
    pub fn new(plane: Plane, x: f64, speed: f64) -> Self {
        Self { plane, x, speed }
    }

    pub fn x(&self) -> f64 {
        self.x
    }
}

impl Entity for LinearRabbit {
    fn advance(&mut self, dt: f64) {
        self.x = self.plane.wrap_x(self.x + self.speed * dt);
    }

    fn report(&self) -> Report {
        Report {
            kind: RabbitKind::Albino,
            position: Position::new(self.x, self.plane.mid_height()),
        }
    }
}
