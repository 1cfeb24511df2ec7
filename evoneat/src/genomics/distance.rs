use super::DistancerConfig;
use crate::substrate::{align, Aligned, Substrate};

/// Returns the compatibility distance between two substrates:
///
/// `cN·n_d + cF·a_d + cC·c_d + cW·w_d`
///
/// where `n_d` counts nodes present in only one substrate,
/// `a_d` is the fraction of matched nodes whose activations
/// differ, `c_d` counts connections present in only one
/// substrate (enabled or not) and `w_d` is the mean absolute
/// weight difference of matched connections.
///
/// The distance is symmetric and zero between identical
/// substrates, but is not a metric.
///
/// # Examples
/// ```
/// use evoneat::genomics::{compatibility_distance, DistancerConfig};
/// use evoneat::substrate::{Activation, Connection, Node, Position, Substrate};
///
/// let (i, o) = (Position::planar(0.0, 0.0), Position::planar(1.0, 0.5));
/// let nodes = vec![Node::input(i), Node::output(o, Activation::Sigmoid, 0.0)];
/// let a = Substrate::from_parts(nodes.clone(), vec![Connection::new(i, o, 1.0)]).unwrap();
/// let b = Substrate::from_parts(nodes, vec![]).unwrap();
///
/// let config = DistancerConfig {
///     conns_coefficient: 2.0,
///     ..DistancerConfig::zero()
/// };
/// assert_eq!(compatibility_distance(&a, &b, &config), 2.0);
/// ```
pub fn compatibility_distance(a: &Substrate, b: &Substrate, config: &DistancerConfig) -> f32 {
    let (mut unmatched_nodes, mut matched_nodes, mut activation_diffs) = (0usize, 0usize, 0usize);
    for step in align(a.nodes(), b.nodes(), |n| n.position()) {
        match step {
            Aligned::Both(x, y) => {
                matched_nodes += 1;
                if x.activation != y.activation {
                    activation_diffs += 1;
                }
            }
            _ => unmatched_nodes += 1,
        }
    }

    let (mut unmatched_conns, mut matched_conns, mut weight_diff) = (0usize, 0usize, 0.0f32);
    for step in align(a.conns(), b.conns(), |c| c.key()) {
        match step {
            Aligned::Both(x, y) => {
                matched_conns += 1;
                weight_diff += (x.weight - y.weight).abs();
            }
            _ => unmatched_conns += 1,
        }
    }

    let activation_fraction = if matched_nodes == 0 {
        0.0
    } else {
        activation_diffs as f32 / matched_nodes as f32
    };
    let mean_weight_diff = if matched_conns == 0 {
        0.0
    } else {
        weight_diff / matched_conns as f32
    };

    config.nodes_coefficient * unmatched_nodes as f32
        + config.activation_coefficient * activation_fraction
        + config.conns_coefficient * unmatched_conns as f32
        + config.weight_coefficient * mean_weight_diff
}
