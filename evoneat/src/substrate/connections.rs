use super::Position;

use serde::{Deserialize, Serialize};

use std::fmt;

/// Connections join two nodes of a substrate and become
/// weighted edges in the translated network.
///
/// A connection is identified by its `(source, target)` pair.
/// Disabled connections are kept in encoded substrates as
/// historical structure and dropped when decoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    source: Position,
    target: Position,
    pub weight: f32,
    pub enabled: bool,
    /// Locked connections are never mutated or removed.
    pub locked: bool,
}

impl Connection {
    /// Returns a new _enabled_ connection with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use evoneat::substrate::{Connection, Position};
    ///
    /// let conn = Connection::new(Position::planar(0.0, 0.0), Position::planar(1.0, 0.5), 2.0);
    /// assert!(conn.enabled);
    /// assert_eq!(conn.weight, 2.0);
    /// ```
    pub fn new(source: Position, target: Position, weight: f32) -> Connection {
        Connection {
            source,
            target,
            weight,
            enabled: true,
            locked: false,
        }
    }

    pub fn source(&self) -> Position {
        self.source
    }

    pub fn target(&self) -> Position {
        self.target
    }

    /// The `(source, target)` identity of the connection.
    pub fn key(&self) -> (Position, Position) {
        (self.source, self.target)
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}->{}, {:.3}{}",
            if self.enabled { "[" } else { "(" },
            self.source,
            self.target,
            self.weight,
            if self.enabled { "]" } else { ")" },
        )
    }
}
