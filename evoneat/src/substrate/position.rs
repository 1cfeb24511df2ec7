use serde::{Deserialize, Serialize};

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Location of a node in a substrate: a layer coordinate in
/// `[0, 1]` and spatial coordinates in `[-1, 1]`.
///
/// Positions identify nodes. They are totally ordered
/// lexicographically on `(layer, x, y, z)`, and two positions
/// are equal only if all four components are bit-equal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Position {
    pub layer: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    /// Returns the position with the given components.
    pub const fn new(layer: f32, x: f32, y: f32, z: f32) -> Position {
        Position { layer, x, y, z }
    }

    /// Returns a position on the `y = z = 0` plane.
    ///
    /// # Examples
    /// ```
    /// use evoneat::substrate::Position;
    ///
    /// assert_eq!(Position::planar(1.0, 0.5), Position::new(1.0, 0.5, 0.0, 0.0));
    /// ```
    pub const fn planar(layer: f32, x: f32) -> Position {
        Position::new(layer, x, 0.0, 0.0)
    }

    /// Component-wise average of two positions.
    ///
    /// # Examples
    /// ```
    /// use evoneat::substrate::Position;
    ///
    /// let mid = Position::planar(0.0, 0.0).midpoint(&Position::planar(1.0, 0.5));
    /// assert_eq!(mid, Position::planar(0.5, 0.25));
    /// ```
    pub fn midpoint(&self, other: &Position) -> Position {
        Position {
            layer: (self.layer + other.layer) / 2.0,
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            z: (self.z + other.z) / 2.0,
        }
    }

    /// The components as `[layer, x, y, z]`.
    pub fn coordinates(&self) -> [f32; 4] {
        [self.layer, self.x, self.y, self.z]
    }

    fn bits(&self) -> [u32; 4] {
        [
            self.layer.to_bits(),
            self.x.to_bits(),
            self.y.to_bits(),
            self.z.to_bits(),
        ]
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Position) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for Position {}

impl Ord for Position {
    fn cmp(&self, other: &Position) -> Ordering {
        self.layer
            .total_cmp(&other.layer)
            .then_with(|| self.x.total_cmp(&other.x))
            .then_with(|| self.y.total_cmp(&other.y))
            .then_with(|| self.z.total_cmp(&other.z))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Position) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.layer, self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_order() {
        let mut positions = vec![
            Position::new(1.0, 0.0, 0.0, 0.0),
            Position::new(0.0, 0.5, 0.0, 0.0),
            Position::new(0.0, 0.5, -1.0, 0.0),
            Position::new(0.5, -1.0, 1.0, 1.0),
            Position::new(0.0, 0.5, -1.0, -0.5),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![
                Position::new(0.0, 0.5, -1.0, -0.5),
                Position::new(0.0, 0.5, -1.0, 0.0),
                Position::new(0.0, 0.5, 0.0, 0.0),
                Position::new(0.5, -1.0, 1.0, 1.0),
                Position::new(1.0, 0.0, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn equality_is_bitwise() {
        assert_eq!(Position::planar(0.5, 0.25), Position::planar(0.5, 0.25));
        assert_ne!(Position::planar(0.0, 0.0), Position::planar(-0.0, 0.0));
        assert_eq!(
            Position::planar(0.0, 0.0).cmp(&Position::planar(0.0, 0.0)),
            Ordering::Equal
        );
    }
}
