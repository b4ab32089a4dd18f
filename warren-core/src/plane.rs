use serde::Serialize;

/// A point on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Toroidal plane of fixed width and height. Leaving one edge re-enters from the
/// opposite one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub width: f64,
    pub height: f64,
}

impl Plane {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Horizontal centre line, where the albino rabbit runs.
    pub fn mid_height(&self) -> f64 {
        self.height / 2.0
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, position: Position) -> bool {
        (0.0..self.width).contains(&position.x) && (0.0..self.height).contains(&position.y)
    }

    pub fn wrap_x(&self, x: f64) -> f64 {
        wrap_once(x, self.width)
    }

    pub fn wrap_y(&self, y: f64) -> f64 {
        wrap_once(y, self.height)
    }

    pub fn wrap(&self, position: Position) -> Position {
        Position::new(self.wrap_x(position.x), self.wrap_y(position.y))
    }
}

/// Single-step modular correction. Only valid while a tick moves less than one
/// full `bound`; config validation rejects anything faster.
fn wrap_once(mut v: f64, bound: f64) -> f64 {
    if v < 0.0 {
        v += bound;
    }
    // A tiny negative value can land exactly on `bound` after the first correction.
    if v >= bound {
        v -= bound;
    }
    v
}
