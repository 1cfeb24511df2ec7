//! The position-keyed network representation evolved by the engine.
//!
//! A [`Substrate`] is an ordered set of [`Node`]s and an ordered set
//! of [`Connection`]s between them. Genomes carry an _encoded_
//! substrate (which may hold disabled connections) and a _decoded_
//! one (ready for translation into an executable network).
mod activation;
mod connections;
mod nodes;
mod position;

pub use activation::Activation;
pub use connections::Connection;
pub use nodes::{Node, NodeKind};
pub use position::Position;

use crate::errors::StructuralError;

use serde::{Deserialize, Serialize};

use std::fmt;

/// Nodes and connections of a feed-forward network.
///
/// # Invariants
/// * Nodes are strictly ascending by position.
/// * Connections are strictly ascending by `(source, target)`.
/// * Every connection endpoint is a node of the substrate.
/// * Every connection is feed-forward: its target lies on a
///   strictly greater layer than its source, its source is
///   not an output node and its target is not an input node.
///
/// Every mutating method preserves these invariants.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Substrate {
    nodes: Vec<Node>,
    conns: Vec<Connection>,
}

impl Substrate {
    /// Returns an empty substrate.
    pub fn new() -> Substrate {
        Substrate::default()
    }

    /// Builds a substrate from unordered parts, sorting them
    /// and checking every invariant.
    ///
    /// # Errors
    /// Returns the first [`StructuralError`] found: duplicate
    /// nodes or connections, connections to missing nodes,
    /// or connections that are not feed-forward.
    ///
    /// # Examples
    /// ```
    /// use evoneat::substrate::{Activation, Connection, Node, Position, Substrate};
    ///
    /// let (i, o) = (Position::planar(0.0, 0.0), Position::planar(1.0, 0.5));
    /// let substrate = Substrate::from_parts(
    ///     vec![Node::output(o, Activation::Sigmoid, 0.0), Node::input(i)],
    ///     vec![Connection::new(i, o, 1.0)],
    /// ).unwrap();
    ///
    /// assert_eq!(substrate.nodes()[0].position(), i);
    /// assert_eq!(substrate.complexity(), 3);
    ///
    /// // Backwards connections are rejected.
    /// assert!(Substrate::from_parts(
    ///     vec![Node::input(i), Node::output(o, Activation::Sigmoid, 0.0)],
    ///     vec![Connection::new(o, i, 1.0)],
    /// ).is_err());
    /// ```
    pub fn from_parts(
        mut nodes: Vec<Node>,
        mut conns: Vec<Connection>,
    ) -> Result<Substrate, StructuralError> {
        nodes.sort_by_key(|n| n.position());
        conns.sort_by_key(|c| c.key());
        let substrate = Substrate { nodes, conns };
        substrate.validate()?;
        Ok(substrate)
    }

    /// Checks every substrate invariant.
    pub fn validate(&self) -> Result<(), StructuralError> {
        for pair in self.nodes.windows(2) {
            if pair[0].position() >= pair[1].position() {
                return Err(StructuralError::DuplicateNode(pair[1].position()));
            }
        }
        for pair in self.conns.windows(2) {
            if pair[0].key() >= pair[1].key() {
                let (source, target) = pair[1].key();
                return Err(StructuralError::DuplicateConn(source, target));
            }
        }
        for conn in &self.conns {
            self.check_conn(conn.source(), conn.target())?;
        }
        Ok(())
    }

    /// Nodes in ascending position order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Connections in ascending `(source, target)` order.
    pub fn conns(&self) -> &[Connection] {
        &self.conns
    }

    /// Mutable access to node parameters. Positions and
    /// kinds cannot change through this, so order is kept.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    /// Mutable access to connection parameters.
    pub fn conns_mut(&mut self) -> impl Iterator<Item = &mut Connection> {
        self.conns.iter_mut()
    }

    pub fn node(&self, position: Position) -> Option<&Node> {
        self.node_index(position).ok().map(|i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, position: Position) -> Option<&mut Node> {
        match self.node_index(position) {
            Ok(i) => Some(&mut self.nodes[i]),
            Err(_) => None,
        }
    }

    pub fn conn(&self, source: Position, target: Position) -> Option<&Connection> {
        self.conn_index(source, target).ok().map(|i| &self.conns[i])
    }

    pub fn conn_mut(&mut self, source: Position, target: Position) -> Option<&mut Connection> {
        match self.conn_index(source, target) {
            Ok(i) => Some(&mut self.conns[i]),
            Err(_) => None,
        }
    }

    pub fn has_node(&self, position: Position) -> bool {
        self.node_index(position).is_ok()
    }

    pub fn has_conn(&self, source: Position, target: Position) -> bool {
        self.conn_index(source, target).is_ok()
    }

    /// Inserts a node in order.
    ///
    /// # Errors
    /// Returns [`StructuralError::DuplicateNode`] if the
    /// position is already occupied.
    pub fn add_node(&mut self, node: Node) -> Result<(), StructuralError> {
        match self.node_index(node.position()) {
            Ok(_) => Err(StructuralError::DuplicateNode(node.position())),
            Err(i) => {
                self.nodes.insert(i, node);
                Ok(())
            }
        }
    }

    /// Inserts a connection in order.
    ///
    /// # Errors
    /// Fails if either endpoint is missing, the connection
    /// is not feed-forward, or it already exists.
    ///
    /// # Examples
    /// ```
    /// use evoneat::substrate::{Activation, Connection, Node, Position, Substrate};
    ///
    /// let (i, o) = (Position::planar(0.0, 0.0), Position::planar(1.0, 0.5));
    /// let mut substrate = Substrate::new();
    /// substrate.add_node(Node::input(i)).unwrap();
    /// substrate.add_node(Node::output(o, Activation::Sigmoid, 0.0)).unwrap();
    ///
    /// assert!(substrate.add_conn(Connection::new(i, o, 0.5)).is_ok());
    /// assert!(substrate.add_conn(Connection::new(i, o, 0.5)).is_err());
    /// ```
    pub fn add_conn(&mut self, conn: Connection) -> Result<(), StructuralError> {
        self.check_conn(conn.source(), conn.target())?;
        match self.conn_index(conn.source(), conn.target()) {
            Ok(_) => Err(StructuralError::DuplicateConn(conn.source(), conn.target())),
            Err(i) => {
                self.conns.insert(i, conn);
                Ok(())
            }
        }
    }

    /// Removes a node together with every connection
    /// incident to it.
    pub fn remove_node(&mut self, position: Position) -> Option<Node> {
        let i = self.node_index(position).ok()?;
        self.conns
            .retain(|c| c.source() != position && c.target() != position);
        Some(self.nodes.remove(i))
    }

    pub fn remove_conn(&mut self, source: Position, target: Position) -> Option<Connection> {
        let i = self.conn_index(source, target).ok()?;
        Some(self.conns.remove(i))
    }

    /// Keeps only the connections for which `keep` returns true.
    pub fn retain_conns(&mut self, keep: impl FnMut(&Connection) -> bool) {
        self.conns.retain(keep);
    }

    /// Connections ending at `position`.
    pub fn incoming(&self, position: Position) -> impl Iterator<Item = &Connection> {
        self.conns.iter().filter(move |c| c.target() == position)
    }

    /// Connections starting at `position`.
    pub fn outgoing(&self, position: Position) -> impl Iterator<Item = &Connection> {
        let start = self.conns.partition_point(|c| c.source() < position);
        self.conns[start..]
            .iter()
            .take_while(move |c| c.source() == position)
    }

    /// Whether a node has no incident connection at all.
    pub fn is_stranded(&self, position: Position) -> bool {
        self.outgoing(position).next().is_none() && self.incoming(position).next().is_none()
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind() == NodeKind::Input)
    }

    pub fn hidden(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind() == NodeKind::Hidden)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind() == NodeKind::Output)
    }

    /// Number of nodes plus number of connections.
    pub fn complexity(&self) -> usize {
        self.nodes.len() + self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether a connection `source -> target` would be legal,
    /// ignoring whether it already exists.
    pub fn check_conn(&self, source: Position, target: Position) -> Result<(), StructuralError> {
        let from = self
            .node(source)
            .ok_or(StructuralError::MissingEndpoint(source))?;
        let to = self
            .node(target)
            .ok_or(StructuralError::MissingEndpoint(target))?;
        let reason = if from.kind() == NodeKind::Output {
            "output nodes cannot be sources"
        } else if to.kind() == NodeKind::Input {
            "input nodes cannot be targets"
        } else if !(target.layer > source.layer) {
            "target layer must be greater than source layer"
        } else {
            return Ok(());
        };
        Err(StructuralError::NotFeedForward {
            from: source,
            to: target,
            reason,
        })
    }

    fn node_index(&self, position: Position) -> Result<usize, usize> {
        self.nodes.binary_search_by(|n| n.position().cmp(&position))
    }

    fn conn_index(&self, source: Position, target: Position) -> Result<usize, usize> {
        self.conns.binary_search_by(|c| c.key().cmp(&(source, target)))
    }
}

impl fmt::Display for Substrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Substrate {{")?;
        for node in &self.nodes {
            writeln!(f, "\t{}", node)?;
        }
        for conn in &self.conns {
            writeln!(f, "\t{}", conn)?;
        }
        write!(f, "}}")
    }
}

/// One step of a merge-walk over two sorted sequences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Aligned<'a, T> {
    Left(&'a T),
    Right(&'a T),
    Both(&'a T, &'a T),
}

/// Walks two sequences sorted ascending by `key` in parallel,
/// pairing up elements with equal keys.
pub(crate) fn align<'a, T, K: Ord>(
    left: &'a [T],
    right: &'a [T],
    key: impl Fn(&T) -> K,
) -> Vec<Aligned<'a, T>> {
    let mut aligned = Vec::with_capacity(left.len().max(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match key(&left[i]).cmp(&key(&right[j])) {
            std::cmp::Ordering::Less => {
                aligned.push(Aligned::Left(&left[i]));
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                aligned.push(Aligned::Right(&right[j]));
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                aligned.push(Aligned::Both(&left[i], &right[j]));
                i += 1;
                j += 1;
            }
        }
    }
    aligned.extend(left[i..].iter().map(Aligned::Left));
    aligned.extend(right[j..].iter().map(Aligned::Right));
    aligned
}
