use evoneat::substrate::{Activation, Node, NodeKind, Position, Substrate};
use evoneat::{Error, StructuralError, Translator};

use ahash::AHashMap;
use log::trace;
use ndarray::{Array1, Array2};

use std::cmp::Ordering;

/// Builds [`FeedForwardNetwork`]s from decoded substrates.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeedForwardTranslator;

impl Translator for FeedForwardTranslator {
    type Network = FeedForwardNetwork;

    fn translate(&self, decoded: &Substrate) -> Result<FeedForwardNetwork, Error> {
        FeedForwardNetwork::new(decoded)
    }
}

/// A neural network evaluated layer by layer.
///
/// Nodes sharing a layer coordinate form a layer. Every layer
/// keeps its biases, its activations and one weight matrix per
/// earlier layer it receives connections from. Input nodes may
/// sit on any layer, next to other nodes; their columns are
/// filled straight from the input matrix.
#[derive(Clone, Debug)]
pub struct FeedForwardNetwork {
    layers: Vec<Layer>,
    /// `(layer, column)` of each input node, in position order.
    inputs: Vec<(usize, usize)>,
    /// `(layer, column)` of each output node, in position order.
    outputs: Vec<(usize, usize)>,
}

#[derive(Clone, Debug)]
struct Layer {
    biases: Array1<f32>,
    activations: Vec<Activation>,
    /// Source layer index and `[source width x width]` weights.
    sources: Vec<(usize, Array2<f32>)>,
    /// Column of each input node of this layer, with the index
    /// of the input matrix column feeding it.
    inputs: Vec<(usize, usize)>,
}

impl FeedForwardNetwork {
    /// Generates a new network from the passed substrate.
    ///
    /// # Errors
    /// Fails if the substrate has no input or no output nodes.
    pub fn new(substrate: &Substrate) -> Result<FeedForwardNetwork, Error> {
        if substrate.inputs().next().is_none() {
            return Err(StructuralError::NoInputs.into());
        }
        if substrate.outputs().next().is_none() {
            return Err(StructuralError::NoOutputs.into());
        }

        let mut grouped: Vec<Vec<&Node>> = vec![];
        for node in substrate.nodes() {
            match grouped.last_mut() {
                Some(layer) if same_layer(&layer[0].position(), &node.position()) => {
                    layer.push(node)
                }
                _ => grouped.push(vec![node]),
            }
        }

        let index: AHashMap<Position, (usize, usize)> = grouped
            .iter()
            .enumerate()
            .flat_map(|(l, layer)| {
                layer
                    .iter()
                    .enumerate()
                    .map(move |(c, n)| (n.position(), (l, c)))
            })
            .collect();
        let inputs: Vec<(usize, usize)> = substrate
            .inputs()
            .filter_map(|n| index.get(&n.position()).copied())
            .collect();

        let mut layers: Vec<Layer> = grouped
            .iter()
            .map(|layer| {
                let (biases, activations): (Vec<f32>, Vec<Activation>) = layer
                    .iter()
                    .map(|n| match n.kind() {
                        NodeKind::Input => (0.0, Activation::Direct),
                        _ => (n.bias, n.activation),
                    })
                    .unzip();
                Layer {
                    biases: Array1::from(biases),
                    activations,
                    sources: vec![],
                    inputs: vec![],
                }
            })
            .collect();
        for (k, &(layer, column)) in inputs.iter().enumerate() {
            layers[layer].inputs.push((column, k));
        }

        for conn in substrate.conns().iter().filter(|c| c.enabled) {
            let locate = |p: Position| {
                index
                    .get(&p)
                    .copied()
                    .ok_or(StructuralError::MissingEndpoint(p))
            };
            let (source_layer, row) = locate(conn.source())?;
            let (target_layer, column) = locate(conn.target())?;
            let layer = &mut layers[target_layer];
            let slot = match layer.sources.iter().position(|(s, _)| *s == source_layer) {
                Some(slot) => slot,
                None => {
                    let shape = (grouped[source_layer].len(), grouped[target_layer].len());
                    layer.sources.push((source_layer, Array2::zeros(shape)));
                    layer.sources.len() - 1
                }
            };
            layer.sources[slot].1[[row, column]] += conn.weight;
        }
        for layer in &mut layers {
            layer.sources.sort_by_key(|(s, _)| *s);
        }

        let outputs = substrate
            .outputs()
            .filter_map(|n| index.get(&n.position()).copied())
            .collect();
        trace!(
            "translated network with layer widths {:?}",
            grouped.iter().map(Vec::len).collect::<Vec<_>>()
        );
        Ok(FeedForwardNetwork {
            layers,
            inputs,
            outputs,
        })
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Number of distinct layers.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Evaluates the network on each row of `inputs`, returning
    /// one row of outputs per input row. Columns follow the
    /// position order of the input and output nodes.
    ///
    /// # Errors
    /// Fails if `inputs` does not have one column per input node.
    pub fn activate(&self, inputs: &Array2<f32>) -> Result<Array2<f32>, Error> {
        if inputs.ncols() != self.inputs.len() {
            return Err(StructuralError::Width {
                expected: self.inputs.len(),
                actual: inputs.ncols(),
            }
            .into());
        }
        let rows = inputs.nrows();
        let mut values: Vec<Array2<f32>> = Vec::with_capacity(self.depth());
        for layer in &self.layers {
            let width = layer.biases.len();
            let mut sums = Array2::from_shape_fn((rows, width), |(_, j)| layer.biases[j]);
            for (source, weights) in &layer.sources {
                sums += &values[*source].dot(weights);
            }
            for &(column, k) in &layer.inputs {
                sums.column_mut(column).assign(&inputs.column(k));
            }
            for (mut column, activation) in sums.columns_mut().into_iter().zip(&layer.activations)
            {
                column.mapv_inplace(|x| activation.apply(x));
            }
            values.push(sums);
        }

        let mut outputs = Array2::<f32>::zeros((rows, self.outputs.len()));
        for (k, &(layer, column)) in self.outputs.iter().enumerate() {
            outputs.column_mut(k).assign(&values[layer].column(column));
        }
        Ok(outputs)
    }
}

fn same_layer(a: &Position, b: &Position) -> bool {
    a.layer.total_cmp(&b.layer) == Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use evoneat::substrate::Connection;
    use ndarray::array;

    const I0: Position = Position::planar(0.0, 0.0);
    const I1: Position = Position::planar(0.0, 1.0);
    const H: Position = Position::planar(0.5, 0.5);
    const O: Position = Position::planar(1.0, 0.5);

    #[test]
    fn bias_is_broadcast_and_linear_paths_add_up() {
        let substrate = Substrate::from_parts(
            vec![
                Node::input(I0),
                Node::input(I1),
                Node::hidden(H, Activation::Direct, 1.0),
                Node::output(O, Activation::Direct, -0.5),
            ],
            vec![
                Connection::new(I0, H, 2.0),
                Connection::new(H, O, 3.0),
                Connection::new(I1, O, 1.0),
            ],
        )
        .unwrap();
        let network = FeedForwardNetwork::new(&substrate).unwrap();
        assert_eq!(network.depth(), 3);

        let outputs = network.activate(&array![[0.0, 0.0], [1.0, 2.0]]).unwrap();
        // o = 3 * (2 * i0 + 1) + i1 - 0.5
        assert_eq!(outputs, array![[2.5], [10.5]]);
    }

    #[test]
    fn disabled_connections_are_ignored() {
        let mut conn = Connection::new(I0, O, 5.0);
        conn.enabled = false;
        let substrate = Substrate::from_parts(
            vec![Node::input(I0), Node::output(O, Activation::Direct, 0.0)],
            vec![conn],
        )
        .unwrap();
        let network = FeedForwardNetwork::new(&substrate).unwrap();
        assert_eq!(network.activate(&array![[1.0]]).unwrap(), array![[0.0]]);
    }

    #[test]
    fn sensors_and_outputs_are_required() {
        let no_outputs = Substrate::from_parts(vec![Node::input(I0)], vec![]).unwrap();
        assert!(matches!(
            FeedForwardNetwork::new(&no_outputs),
            Err(Error::Structural(StructuralError::NoOutputs))
        ));
        let no_inputs =
            Substrate::from_parts(vec![Node::output(O, Activation::Sigmoid, 0.0)], vec![]).unwrap();
        assert!(matches!(
            FeedForwardNetwork::new(&no_inputs),
            Err(Error::Structural(StructuralError::NoInputs))
        ));
    }

    #[test]
    fn inputs_may_share_a_layer_with_other_nodes() {
        let substrate = Substrate::from_parts(
            vec![
                Node::input(I0),
                Node::hidden(I1, Activation::Direct, 2.0),
                Node::output(O, Activation::Direct, 0.0),
            ],
            vec![Connection::new(I0, O, 1.0), Connection::new(I1, O, 0.5)],
        )
        .unwrap();
        let network = FeedForwardNetwork::new(&substrate).unwrap();
        assert_eq!(network.input_count(), 1);
        assert_eq!(network.depth(), 2);
        // o = i0 + 0.5 * 2
        assert_eq!(network.activate(&array![[3.0]]).unwrap(), array![[4.0]]);
    }

    #[test]
    fn input_width_is_checked() {
        let substrate = Substrate::from_parts(
            vec![Node::input(I0), Node::output(O, Activation::Sigmoid, 0.0)],
            vec![],
        )
        .unwrap();
        let network = FeedForwardNetwork::new(&substrate).unwrap();
        assert!(matches!(
            network.activate(&array![[1.0, 2.0]]),
            Err(Error::Structural(StructuralError::Width { expected: 1, actual: 2 }))
        ));
    }
}
