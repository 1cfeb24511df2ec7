use super::Mutator;
use crate::errors::Error;
use crate::genome::Genome;
use crate::genomics::ComplexifyConfig;
use crate::rng::RandomSource;
use crate::substrate::{Connection, Node, NodeKind, Position, Substrate};

use rand::seq::SliceRandom;

/// Grows topology by splitting connections with new
/// nodes, or by adding new connections.
#[derive(Clone, Debug)]
pub struct Complexify {
    config: ComplexifyConfig,
}

impl Complexify {
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(config: ComplexifyConfig) -> Result<Complexify, Error> {
        config.validate()?;
        Ok(Complexify { config })
    }

    /// Splits a random enabled connection `s -> t` with a
    /// hidden node at the midpoint of `s` and `t`. The split
    /// connection is disabled and replaced by `s -> new`
    /// (weight 1) and `new -> t` (the original weight).
    ///
    /// Does nothing and returns `false` if the midpoint
    /// is already occupied.
    ///
    /// # Examples
    /// ```
    /// use evoneat::RandomSource;
    /// use evoneat::genomics::{Complexify, ComplexifyConfig};
    /// use evoneat::substrate::{Activation, Connection, Node, Position, Substrate};
    ///
    /// let (i, o) = (Position::planar(0.0, 0.0), Position::planar(1.0, 0.5));
    /// let mut substrate = Substrate::from_parts(
    ///     vec![Node::input(i), Node::output(o, Activation::Sigmoid, 0.0)],
    ///     vec![Connection::new(i, o, 2.0)],
    /// ).unwrap();
    ///
    /// let complexify = Complexify::new(ComplexifyConfig::zero()).unwrap();
    /// assert!(complexify.add_node(&mut RandomSource::seeded(0), &mut substrate).unwrap());
    /// assert!(substrate.has_node(Position::planar(0.5, 0.25)));
    /// assert!(!substrate.conn(i, o).unwrap().enabled);
    /// ```
    pub fn add_node(
        &self,
        rng: &mut RandomSource,
        substrate: &mut Substrate,
    ) -> Result<bool, Error> {
        let candidates: Vec<(Position, Position, f32)> = substrate
            .conns()
            .iter()
            .filter(|c| c.enabled && !c.locked)
            .map(|c| (c.source(), c.target(), c.weight))
            .collect();
        let (source, target, weight) = match candidates.choose(rng) {
            Some(chosen) => *chosen,
            None => return Ok(false),
        };

        let position = source.midpoint(&target);
        if substrate.has_node(position)
            || !(position.layer > source.layer && position.layer < target.layer)
        {
            return Ok(false);
        }

        let bias = rng.clipped_normal(self.config.bias_power, self.config.max_bias);
        substrate.add_node(Node::hidden(position, self.config.hidden_activation, bias))?;
        if let Some(split) = substrate.conn_mut(source, target) {
            split.enabled = false;
        }
        substrate.add_conn(Connection::new(source, position, 1.0))?;
        substrate.add_conn(Connection::new(position, target, weight))?;
        Ok(true)
    }

    /// Connects a random pair of unconnected nodes, visiting
    /// candidate sources and targets in random order.
    ///
    /// Returns `false` if no legal pair is left.
    pub fn add_conn(
        &self,
        rng: &mut RandomSource,
        substrate: &mut Substrate,
    ) -> Result<bool, Error> {
        let mut sources: Vec<Position> = substrate
            .nodes()
            .iter()
            .filter(|n| n.kind() != NodeKind::Output)
            .map(|n| n.position())
            .collect();
        let mut targets: Vec<Position> = substrate
            .nodes()
            .iter()
            .filter(|n| n.kind() != NodeKind::Input)
            .map(|n| n.position())
            .collect();
        sources.shuffle(rng);
        targets.shuffle(rng);

        for source in &sources {
            for target in &targets {
                if target.layer > source.layer && !substrate.has_conn(*source, *target) {
                    let weight =
                        rng.clipped_normal(self.config.weight_power, self.config.max_weight);
                    substrate.add_conn(Connection::new(*source, *target, weight))?;
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

impl Mutator for Complexify {
    fn mutate(&self, rng: &mut RandomSource, genome: &mut Genome) -> Result<bool, Error> {
        if rng.gen_bool(self.config.add_node_probability)
            && self.add_node(rng, &mut genome.encoded)?
        {
            return Ok(true);
        }
        if rng.gen_bool(self.config.add_conn_probability) {
            return self.add_conn(rng, &mut genome.encoded);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substrate::Activation;

    const I: Position = Position::planar(0.0, 0.0);
    const O: Position = Position::planar(1.0, 0.5);
    const MID: Position = Position::planar(0.5, 0.25);

    fn single_conn() -> Genome {
        let encoded = Substrate::from_parts(
            vec![Node::input(I), Node::output(O, Activation::Sigmoid, 0.0)],
            vec![Connection::new(I, O, 2.0)],
        )
        .unwrap();
        Genome::new(1, encoded, vec![])
    }

    fn always_add_node() -> Complexify {
        Complexify::new(ComplexifyConfig {
            add_node_probability: 1.0,
            hidden_activation: Activation::Tanh,
            ..ComplexifyConfig::zero()
        })
        .unwrap()
    }

    #[test]
    fn add_node_splits_connection() {
        let mut genome = single_conn();
        assert!(always_add_node()
            .mutate(&mut RandomSource::seeded(4), &mut genome)
            .unwrap());

        let encoded = &genome.encoded;
        assert_eq!(encoded.nodes().len(), 3);
        assert_eq!(encoded.node(MID).unwrap().kind(), NodeKind::Hidden);
        assert_eq!(encoded.node(MID).unwrap().activation, Activation::Tanh);
        assert!(!encoded.conn(I, O).unwrap().enabled);
        let first = encoded.conn(I, MID).unwrap();
        assert!(first.enabled);
        assert_eq!(first.weight, 1.0);
        let second = encoded.conn(MID, O).unwrap();
        assert!(second.enabled);
        assert_eq!(second.weight, 2.0);
        assert!(encoded.validate().is_ok());
    }

    #[test]
    fn occupied_midpoint_is_a_no_op() {
        let mut genome = single_conn();
        genome
            .encoded
            .add_node(Node::hidden(MID, Activation::Sigmoid, 0.0))
            .unwrap();
        let before = genome.clone();
        assert!(!always_add_node()
            .mutate(&mut RandomSource::seeded(4), &mut genome)
            .unwrap());
        assert_eq!(genome, before);
    }

    #[test]
    fn add_conn_respects_feed_forward_rules() {
        let complexify = Complexify::new(ComplexifyConfig {
            add_conn_probability: 1.0,
            weight_power: 1.0,
            max_weight: 1.0,
            ..ComplexifyConfig::zero()
        })
        .unwrap();
        let mut genome = single_conn();
        genome
            .encoded
            .add_node(Node::hidden(MID, Activation::Sigmoid, 0.0))
            .unwrap();

        let mut rng = RandomSource::seeded(8);
        assert!(complexify.mutate(&mut rng, &mut genome).unwrap());
        assert!(complexify.mutate(&mut rng, &mut genome).unwrap());
        // I->O, I->MID and MID->O are the only legal connections.
        assert!(!complexify.mutate(&mut rng, &mut genome).unwrap());
        assert_eq!(genome.encoded.conns().len(), 3);
        assert!(genome.encoded.validate().is_ok());
        assert!(genome.encoded.conns().iter().all(|c| c.weight.abs() <= 1.0));
    }

    #[test]
    fn disabled_connections_are_not_split() {
        let mut genome = single_conn();
        genome.encoded.conn_mut(I, O).unwrap().enabled = false;
        assert!(!always_add_node()
            .mutate(&mut RandomSource::seeded(0), &mut genome)
            .unwrap());
    }
}
