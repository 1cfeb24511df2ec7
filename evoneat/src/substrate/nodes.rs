use super::{Activation, Position};

use serde::{Deserialize, Serialize};

use std::fmt;

/// A NodeKind indicates the role of the node
/// in the network translated from a substrate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Sensor nodes, fed by the input matrix.
    Input,
    Hidden,
    /// Actuator nodes, read into the output matrix.
    Output,
}

/// Nodes are the structural elements of substrates
/// between which connections are made.
///
/// A node is identified by its position; the position
/// and kind are fixed at creation, while activation,
/// bias and lock state are open to mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    position: Position,
    kind: NodeKind,
    pub activation: Activation,
    /// Ignored for input nodes.
    pub bias: f32,
    /// Locked nodes are never mutated or removed.
    pub locked: bool,
}

impl Node {
    /// Returns a new node with the passed parameters.
    ///
    /// # Examples
    /// ```
    /// use evoneat::substrate::{Activation, Node, NodeKind, Position};
    ///
    /// let node = Node::new(Position::planar(0.5, 0.0), NodeKind::Hidden, Activation::Tanh, 0.3);
    /// assert_eq!(node.kind(), NodeKind::Hidden);
    /// assert!(!node.locked);
    /// ```
    pub fn new(position: Position, kind: NodeKind, activation: Activation, bias: f32) -> Node {
        Node {
            position,
            kind,
            activation,
            bias,
            locked: false,
        }
    }

    /// An input node with direct activation and no bias.
    pub fn input(position: Position) -> Node {
        Node::new(position, NodeKind::Input, Activation::Direct, 0.0)
    }

    pub fn hidden(position: Position, activation: Activation, bias: f32) -> Node {
        Node::new(position, NodeKind::Hidden, activation, bias)
    }

    pub fn output(position: Position, activation: Activation, bias: f32) -> Node {
        Node::new(position, NodeKind::Output, activation, bias)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}{}[{}, {:+.3}]{}",
            self.kind,
            self.position,
            self.activation,
            self.bias,
            if self.locked { "*" } else { "" },
        )
    }
}
