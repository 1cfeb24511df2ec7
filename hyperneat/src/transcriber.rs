use crate::config::HyperNeatConfig;
use crate::inspection::BIAS;

use evoneat::substrate::{Connection, Node, NodeKind, Substrate};
use evoneat::{Error, NeatTranscriber, StructuralError, Transcriber};
use evoneat_nn::FeedForwardNetwork;

use log::trace;
use ndarray::Array2;

use std::cmp::Ordering;

/// Number of CPPN inputs: source then target coordinates.
pub const CPPN_INPUTS: usize = 8;

/// Decodes CPPN genomes into connections over a fixed
/// template of nodes.
///
/// Every pair of adjacent template layers is queried: the
/// CPPN receives the coordinates of each candidate source and
/// target, and the configured [`Inspection`] decides whether
/// the connection exists and with which weight. A second pass
/// sets the bias of every hidden and output node.
///
/// [`Inspection`]: crate::Inspection
#[derive(Clone, Debug)]
pub struct HyperNeatTranscriber {
    template: Substrate,
    /// Template node indices, grouped by layer.
    layers: Vec<Vec<usize>>,
    config: HyperNeatConfig,
}

impl HyperNeatTranscriber {
    /// # Errors
    /// Fails if `config` is invalid, or if `template` is empty,
    /// has no input or output nodes, or already has connections.
    pub fn new(
        template: Substrate,
        config: HyperNeatConfig,
    ) -> Result<HyperNeatTranscriber, Error> {
        config.validate()?;
        if template.is_empty() {
            return Err(StructuralError::Empty.into());
        }
        if template.inputs().next().is_none() {
            return Err(StructuralError::NoInputs.into());
        }
        if template.outputs().next().is_none() {
            return Err(StructuralError::NoOutputs.into());
        }
        if !template.conns().is_empty() {
            return Err(StructuralError::HasExistingConns.into());
        }

        let mut layers: Vec<Vec<usize>> = vec![];
        let nodes = template.nodes();
        for (i, node) in nodes.iter().enumerate() {
            match layers.last_mut() {
                Some(layer)
                    if nodes[layer[0]]
                        .position()
                        .layer
                        .total_cmp(&node.position().layer)
                        == Ordering::Equal =>
                {
                    layer.push(i)
                }
                _ => layers.push(vec![i]),
            }
        }
        Ok(HyperNeatTranscriber {
            template,
            layers,
            config,
        })
    }

    pub fn template(&self) -> &Substrate {
        &self.template
    }

    pub fn config(&self) -> &HyperNeatConfig {
        &self.config
    }

    fn cppn(&self, encoded: &Substrate) -> Result<FeedForwardNetwork, Error> {
        let cppn = FeedForwardNetwork::new(&NeatTranscriber.transcribe(encoded)?)?;
        if cppn.input_count() != CPPN_INPUTS {
            return Err(StructuralError::Width {
                expected: CPPN_INPUTS,
                actual: cppn.input_count(),
            }
            .into());
        }
        let needed = self.config.inspection.output_count();
        if cppn.output_count() < needed {
            return Err(StructuralError::Width {
                expected: needed,
                actual: cppn.output_count(),
            }
            .into());
        }
        Ok(cppn)
    }

    fn connect(&self, cppn: &FeedForwardNetwork) -> Result<Vec<Connection>, Error> {
        let nodes = self.template.nodes();
        let mut conns = vec![];
        for pair in self.layers.windows(2) {
            let (sources, targets) = (&pair[0], &pair[1]);
            let candidates: Vec<(&Node, &Node)> = sources
                .iter()
                .flat_map(|&s| targets.iter().map(move |&t| (&nodes[s], &nodes[t])))
                .collect();
            let queries = Array2::from_shape_fn((candidates.len(), CPPN_INPUTS), |(row, col)| {
                let (source, target) = candidates[row];
                if col < 4 {
                    source.position().coordinates()[col]
                } else {
                    target.position().coordinates()[col - 4]
                }
            });
            let outputs = cppn.activate(&queries)?;
            for ((source, target), row) in candidates.iter().zip(outputs.rows()) {
                let row: Vec<f32> = row.to_vec();
                let (weight, expression) =
                    self.config.inspection.inspect(&row, self.config.weight_power);
                let legal = source.kind() != NodeKind::Output && target.kind() != NodeKind::Input;
                if expression > 0.0 && legal {
                    conns.push(Connection::new(source.position(), target.position(), weight));
                }
            }
        }
        Ok(conns)
    }

    fn biases(&self, cppn: &FeedForwardNetwork) -> Result<Vec<Node>, Error> {
        let mut nodes = self.template.nodes().to_vec();
        let biased: Vec<usize> = (0..nodes.len())
            .filter(|&i| nodes[i].kind() != NodeKind::Input)
            .collect();
        if biased.is_empty() {
            return Ok(nodes);
        }
        let queries = Array2::from_shape_fn((biased.len(), CPPN_INPUTS), |(row, col)| {
            if col < 4 {
                nodes[biased[row]].position().coordinates()[col]
            } else {
                0.0
            }
        });
        let outputs = cppn.activate(&queries)?;
        for (&i, row) in biased.iter().zip(outputs.rows()) {
            nodes[i].bias = row[BIAS] * self.config.bias_power;
        }
        Ok(nodes)
    }
}

impl Transcriber for HyperNeatTranscriber {
    fn transcribe(&self, encoded: &Substrate) -> Result<Substrate, Error> {
        let cppn = self.cppn(encoded)?;
        let conns = self.connect(&cppn)?;
        let nodes = self.biases(&cppn)?;
        trace!("expressed {} connections", conns.len());
        Ok(Substrate::from_parts(nodes, conns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Inspection;
    use evoneat::substrate::{Activation, Position};

    fn template() -> Substrate {
        Substrate::from_parts(
            vec![
                Node::input(Position::planar(0.0, -1.0)),
                Node::input(Position::planar(0.0, 1.0)),
                Node::hidden(Position::planar(0.5, 0.0), Activation::Sigmoid, 0.0),
                Node::output(Position::planar(1.0, 0.0), Activation::Sigmoid, 0.0),
            ],
            vec![],
        )
        .unwrap()
    }

    /// A CPPN whose every output is `bias` plus the source x
    /// coordinate.
    fn cppn(outputs: usize, bias: f32) -> Substrate {
        let inputs: Vec<Position> = (0..CPPN_INPUTS)
            .map(|i| Position::planar(0.0, i as f32))
            .collect();
        let mut nodes: Vec<Node> = inputs.iter().copied().map(Node::input).collect();
        let mut conns = vec![];
        for o in 0..outputs {
            let position = Position::planar(1.0, o as f32);
            nodes.push(Node::output(position, Activation::Direct, bias));
            conns.push(Connection::new(inputs[1], position, 1.0));
        }
        Substrate::from_parts(nodes, conns).unwrap()
    }

    #[test]
    fn template_is_checked() {
        let config = HyperNeatConfig::zero();
        assert!(matches!(
            HyperNeatTranscriber::new(Substrate::new(), config.clone()),
            Err(Error::Structural(StructuralError::Empty))
        ));
        let a = Position::planar(0.0, 0.0);
        let b = Position::planar(1.0, 0.0);
        let wired = Substrate::from_parts(
            vec![Node::input(a), Node::output(b, Activation::Sigmoid, 0.0)],
            vec![Connection::new(a, b, 1.0)],
        )
        .unwrap();
        assert!(matches!(
            HyperNeatTranscriber::new(wired, config),
            Err(Error::Structural(StructuralError::HasExistingConns))
        ));
    }

    #[test]
    fn link_expression_follows_source_coordinate() {
        let config = HyperNeatConfig {
            weight_power: 2.0,
            bias_power: 1.0,
            ..HyperNeatConfig::zero()
        };
        let transcriber = HyperNeatTranscriber::new(template(), config).unwrap();
        let decoded = transcriber.transcribe(&cppn(3, 0.0)).unwrap();

        // Only sources with x > 0 are expressed: the second
        // input, and the hidden node at x = 0 is not.
        let conns = decoded.conns();
        assert_eq!(conns.len(), 1);
        assert_eq!(conns[0].source(), Position::planar(0.0, 1.0));
        assert_eq!(conns[0].target(), Position::planar(0.5, 0.0));
        assert_eq!(conns[0].weight, 2.0);
        assert!(decoded.validate().is_ok());
    }

    #[test]
    fn biases_come_from_the_second_pass() {
        let config = HyperNeatConfig {
            bias_power: 2.0,
            inspection: Inspection::ConstantThreshold(0.5),
            ..HyperNeatConfig::zero()
        };
        let transcriber = HyperNeatTranscriber::new(template(), config).unwrap();
        let decoded = transcriber.transcribe(&cppn(2, 0.25)).unwrap();
        for node in decoded.nodes() {
            match node.kind() {
                NodeKind::Input => assert_eq!(node.bias, 0.0),
                _ => assert_eq!(node.bias, (0.25 + node.position().x) * 2.0),
            }
        }
    }

    #[test]
    fn cppn_shape_is_checked() {
        let transcriber = HyperNeatTranscriber::new(template(), HyperNeatConfig::zero()).unwrap();
        assert!(matches!(
            transcriber.transcribe(&cppn(2, 0.0)),
            Err(Error::Structural(StructuralError::Width { expected: 3, actual: 2 }))
        ));
    }
}
