//! Shared building blocks for the rabbit simulation: the toroidal plane, the
//! entity capability trait, reports, the logical tick clock and pacing.

pub mod clock;
pub mod entity;
pub mod pacing;
pub mod plane;

pub use clock::TickClock;
pub use entity::{Entity, Frame, RabbitKind, Report};
pub use pacing::Pacing;
pub use plane::{Plane, Position};
