//! The two rabbits and the loops that drive them.

pub mod driver;
pub mod heading;
pub mod linear;
pub mod rabbit;
pub mod wandering;

pub use driver::{Completed, SerialDriver, SimulationError, ThreadedDriver};
pub use heading::{HeadingSource, RandomHeadings};
pub use linear::LinearRabbit;
pub use rabbit::Rabbit;
pub use wandering::WanderingRabbit;
