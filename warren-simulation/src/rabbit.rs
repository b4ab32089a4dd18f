use crate::heading::HeadingSource;
use crate::linear::LinearRabbit;
use crate::wandering::WanderingRabbit;
use warren_core::{Entity, Plane, Position, RabbitKind, Report};

/// Either kind of rabbit, so drivers can hold both in one `Vec` without boxing.
#[derive(Debug)]
pub enum Rabbit {
    Regular(WanderingRabbit),
    Albino(LinearRabbit),
}

impl Rabbit {
    pub fn regular(
        plane: Plane,
        start: Position,
        speed: f64,
        source: Box<dyn HeadingSource>,
    ) -> Self {
        Rabbit::Regular(WanderingRabbit::new(plane, start, speed, source))
    }

    pub fn albino(plane: Plane, start_x: f64, speed: f64) -> Self {
        Rabbit::Albino(LinearRabbit::new(plane, start_x, speed))
    }

    pub fn kind(&self) -> RabbitKind {
        match self {
            Rabbit::Regular(_) => RabbitKind::Regular,
            Rabbit::Albino(_) => RabbitKind::Albino,
        }
    }
}

impl Entity for Rabbit {
    fn advance(&mut self, dt: f64) {
        match self {
            Rabbit::Regular(rabbit) => rabbit.advance(dt),
            Rabbit::Albino(rabbit) => rabbit.advance(dt),
        }
    }

    fn report(&self) -> Report {
        match self {
            Rabbit::Regular(rabbit) => rabbit.report(),
            Rabbit::Albino(rabbit) => rabbit.report(),
        }
    }
}
