//! Transient canvas coordinate value.

/// 2D canvas coordinate for one post.
///
/// Values are immutable: gestures derive new positions through
/// [`Position::translated`] instead of mutating a shared handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Returns this position shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns the offset that moves `origin` onto `self`.
    pub fn offset_from(&self, origin: Position) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }

    pub fn distance_to(&self, other: Position) -> f64 {
        let (dx, dy) = self.offset_from(other);
        dx.hypot(dy)
    }
}
