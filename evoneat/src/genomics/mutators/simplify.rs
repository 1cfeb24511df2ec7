use super::Mutator;
use crate::errors::Error;
use crate::genome::Genome;
use crate::genomics::SimplifyConfig;
use crate::rng::RandomSource;
use crate::substrate::{Connection, NodeKind, Position, Substrate};

use rand::seq::SliceRandom;

/// Shrinks topology by deleting connections or hidden nodes.
/// Input and output nodes are never removed.
#[derive(Clone, Debug)]
pub struct Simplify {
    config: SimplifyConfig,
}

impl Simplify {
    pub fn new(config: SimplifyConfig) -> Result<Simplify, Error> {
        config.validate()?;
        Ok(Simplify { config })
    }

    /// Removes a random unlocked connection, then any hidden
    /// endpoint left without connections.
    pub fn del_conn(&self, rng: &mut RandomSource, substrate: &mut Substrate) -> bool {
        let candidates: Vec<(Position, Position)> = substrate
            .conns()
            .iter()
            .filter(|c| !c.locked)
            .map(|c| c.key())
            .collect();
        let (source, target) = match candidates.choose(rng) {
            Some(key) => *key,
            None => return false,
        };
        substrate.remove_conn(source, target);
        for end in [source, target] {
            remove_if_stranded(substrate, end);
        }
        true
    }

    /// Removes a random hidden node with at most one incoming
    /// or at most one outgoing connection. Every incoming
    /// connection is first spliced into every outgoing one,
    /// with the product of both weights, so paths through the
    /// node survive.
    ///
    /// # Examples
    /// ```
    /// use evoneat::RandomSource;
    /// use evoneat::genomics::{Simplify, SimplifyConfig};
    /// use evoneat::substrate::{Activation, Connection, Node, Position, Substrate};
    ///
    /// let (i, h, o) = (
    ///     Position::planar(0.0, 0.0),
    ///     Position::planar(0.5, 0.0),
    ///     Position::planar(1.0, 0.0),
    /// );
    /// let mut substrate = Substrate::from_parts(
    ///     vec![
    ///         Node::input(i),
    ///         Node::hidden(h, Activation::Tanh, 0.0),
    ///         Node::output(o, Activation::Tanh, 0.0),
    ///     ],
    ///     vec![Connection::new(i, h, 2.0), Connection::new(h, o, -1.5)],
    /// ).unwrap();
    ///
    /// let simplify = Simplify::new(SimplifyConfig::zero()).unwrap();
    /// assert!(simplify.del_node(&mut RandomSource::seeded(0), &mut substrate).unwrap());
    /// assert!(!substrate.has_node(h));
    /// assert_eq!(substrate.conn(i, o).unwrap().weight, -3.0);
    /// ```
    pub fn del_node(
        &self,
        rng: &mut RandomSource,
        substrate: &mut Substrate,
    ) -> Result<bool, Error> {
        let candidates: Vec<Position> = substrate
            .hidden()
            .filter(|n| !n.locked)
            .map(|n| n.position())
            .filter(|p| {
                let (incoming, outgoing) = (substrate.incoming(*p), substrate.outgoing(*p));
                let locked = substrate
                    .incoming(*p)
                    .chain(substrate.outgoing(*p))
                    .any(|c| c.locked);
                !locked && (incoming.count() <= 1 || outgoing.count() <= 1)
            })
            .collect();
        let position = match candidates.choose(rng) {
            Some(position) => *position,
            None => return Ok(false),
        };

        let incoming: Vec<Connection> = substrate.incoming(position).cloned().collect();
        let outgoing: Vec<Connection> = substrate.outgoing(position).cloned().collect();
        substrate.remove_node(position);
        for before in &incoming {
            for after in &outgoing {
                if substrate.has_conn(before.source(), after.target()) {
                    continue;
                }
                let mut spliced = Connection::new(
                    before.source(),
                    after.target(),
                    before.weight * after.weight,
                );
                spliced.enabled = before.enabled && after.enabled;
                substrate.add_conn(spliced)?;
            }
        }
        Ok(true)
    }
}

impl Mutator for Simplify {
    fn mutate(&self, rng: &mut RandomSource, genome: &mut Genome) -> Result<bool, Error> {
        if rng.gen_bool(self.config.del_conn_probability)
            && self.del_conn(rng, &mut genome.encoded)
        {
            return Ok(true);
        }
        if rng.gen_bool(self.config.del_node_probability) {
            return self.del_node(rng, &mut genome.encoded);
        }
        Ok(false)
    }
}

/// Removes unlocked hidden nodes that have no incident
/// connection, leaving every other part of the substrate
/// (including dead-end paths) as it is.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pruning;

impl Mutator for Pruning {
    fn mutate(&self, _rng: &mut RandomSource, genome: &mut Genome) -> Result<bool, Error> {
        let stranded: Vec<Position> = genome
            .encoded
            .hidden()
            .map(|n| n.position())
            .filter(|p| genome.encoded.is_stranded(*p))
            .collect();
        let mut pruned = false;
        for position in stranded {
            pruned |= remove_if_stranded(&mut genome.encoded, position);
        }
        Ok(pruned)
    }
}

fn remove_if_stranded(substrate: &mut Substrate, position: Position) -> bool {
    let removable = substrate
        .node(position)
        .map_or(false, |n| n.kind() == NodeKind::Hidden && !n.locked);
    if removable && substrate.is_stranded(position) {
        substrate.remove_node(position);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substrate::{Activation, Node};

    const I0: Position = Position::planar(0.0, 0.0);
    const I1: Position = Position::planar(0.0, 1.0);
    const H: Position = Position::planar(0.5, 0.5);
    const O: Position = Position::planar(1.0, 0.5);

    fn genome() -> Genome {
        let encoded = Substrate::from_parts(
            vec![
                Node::input(I0),
                Node::input(I1),
                Node::hidden(H, Activation::Sigmoid, 0.0),
                Node::output(O, Activation::Sigmoid, 0.0),
            ],
            vec![
                Connection::new(I0, H, 2.0),
                Connection::new(I1, H, 3.0),
                Connection::new(H, O, 0.5),
            ],
        )
        .unwrap();
        Genome::new(1, encoded, vec![])
    }

    #[test]
    fn del_node_splices_paths() {
        let simplify = Simplify::new(SimplifyConfig {
            del_node_probability: 1.0,
            ..SimplifyConfig::zero()
        })
        .unwrap();
        let mut genome = genome();
        assert!(simplify
            .mutate(&mut RandomSource::seeded(1), &mut genome)
            .unwrap());
        assert!(!genome.encoded.has_node(H));
        assert_eq!(genome.encoded.conn(I0, O).unwrap().weight, 1.0);
        assert_eq!(genome.encoded.conn(I1, O).unwrap().weight, 1.5);
        assert!(genome.encoded.validate().is_ok());
    }

    #[test]
    fn del_conn_removes_stranded_hidden_node() {
        let simplify = Simplify::new(SimplifyConfig::zero()).unwrap();
        let mut genome = genome();
        genome.encoded.remove_conn(I0, H);
        genome.encoded.remove_conn(I1, H);
        assert!(simplify.del_conn(&mut RandomSource::seeded(0), &mut genome.encoded));
        assert!(!genome.encoded.has_node(H));
        assert!(genome.encoded.has_node(O));
        assert_eq!(genome.encoded.nodes().len(), 3);
    }

    #[test]
    fn inputs_and_outputs_survive() {
        let simplify = Simplify::new(SimplifyConfig {
            del_conn_probability: 1.0,
            ..SimplifyConfig::zero()
        })
        .unwrap();
        let mut genome = genome();
        let mut rng = RandomSource::seeded(3);
        while simplify.mutate(&mut rng, &mut genome).unwrap() {}
        assert!(genome.encoded.conns().is_empty());
        let kinds: Vec<NodeKind> = genome.encoded.nodes().iter().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![NodeKind::Input, NodeKind::Input, NodeKind::Output]);
    }

    #[test]
    fn pruning_only_removes_stranded_nodes() {
        let mut genome = genome();
        let dead_end = Position::planar(0.5, 0.0);
        genome
            .encoded
            .add_node(Node::hidden(dead_end, Activation::Sigmoid, 0.0))
            .unwrap();
        genome
            .encoded
            .add_node(Node::hidden(Position::planar(0.5, 1.0), Activation::Sigmoid, 0.0))
            .unwrap();
        genome.encoded.add_conn(Connection::new(I0, dead_end, 1.0)).unwrap();

        assert!(Pruning.mutate(&mut RandomSource::seeded(0), &mut genome).unwrap());
        assert!(genome.encoded.has_node(dead_end));
        assert!(!genome.encoded.has_node(Position::planar(0.5, 1.0)));
        assert!(!Pruning.mutate(&mut RandomSource::seeded(0), &mut genome).unwrap());
    }
}
