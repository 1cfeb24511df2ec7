use evoneat::substrate::{Activation, Connection, Node, Position, Substrate};
use evoneat::{NeatTranscriber, Transcriber, Translator};
use evoneat_nn::{FeedForwardNetwork, FeedForwardTranslator};

use ndarray::{array, Array2};

const I0: Position = Position::planar(0.0, 0.0);
const I1: Position = Position::planar(0.0, 1.0);
const H: Position = Position::planar(0.5, 0.5);
const O: Position = Position::planar(1.0, 0.5);

fn xor_substrate(hidden_bias: f32, output_bias: f32) -> Substrate {
    Substrate::from_parts(
        vec![
            Node::input(I0),
            Node::input(I1),
            Node::hidden(H, Activation::SteepenedSigmoid, hidden_bias),
            Node::output(O, Activation::Sigmoid, output_bias),
        ],
        vec![
            Connection::new(I0, H, 3.650676),
            Connection::new(I1, H, -4.790058),
            Connection::new(I0, O, -4.028692),
            Connection::new(I1, O, 3.972927),
            Connection::new(H, O, 7.99501),
        ],
    )
    .unwrap()
}

#[test]
fn hand_built_network_solves_xor() {
    let network = FeedForwardTranslator
        .translate(&xor_substrate(-1.695151, -1.967445))
        .unwrap();
    let outputs = network
        .activate(&array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]])
        .unwrap();
    assert_eq!(outputs.dim(), (4, 1));
    assert!(outputs[[0, 0]] < 0.5);
    assert!(outputs[[1, 0]] > 0.5);
    assert!(outputs[[2, 0]] > 0.5);
    assert!(outputs[[3, 0]] < 0.5);
}

#[test]
fn biases_shift_pre_activation_sums() {
    let network = |hidden_bias: f32, output_bias: f32| {
        let mut substrate = xor_substrate(hidden_bias, output_bias);
        for node in substrate.nodes_mut() {
            node.activation = Activation::Direct;
        }
        FeedForwardNetwork::new(&substrate).unwrap()
    };
    let inputs = array![[0.0, 0.0], [1.0, 0.0], [0.3, -0.7]];
    let biased = network(0.25, -1.5).activate(&inputs).unwrap();
    let unbiased = network(0.0, 0.0).activate(&inputs).unwrap();
    // The hidden bias reaches the output through the H -> O weight.
    let shift = 0.25 * 7.99501 - 1.5;
    for (b, u) in biased.iter().zip(unbiased.iter()) {
        assert!((b - (u + shift)).abs() < 1e-4);
    }
}

#[test]
fn translation_needs_inputs_and_outputs() {
    let only_hidden =
        Substrate::from_parts(vec![Node::hidden(H, Activation::Tanh, 0.0)], vec![]).unwrap();
    assert!(FeedForwardTranslator
        .translate(&NeatTranscriber.transcribe(&only_hidden).unwrap())
        .is_err());
    let decoded = NeatTranscriber.transcribe(&xor_substrate(0.0, 0.0)).unwrap();
    assert!(FeedForwardTranslator.translate(&decoded).is_ok());
}

#[test]
fn activation_is_pure() {
    let network = FeedForwardTranslator
        .translate(&xor_substrate(-1.695151, -1.967445))
        .unwrap();
    let inputs: Array2<f32> = array![[0.2, 0.9], [0.5, 0.5]];
    assert_eq!(network.activate(&inputs).unwrap(), network.activate(&inputs).unwrap());
}

#[test]
fn inputs_need_not_form_a_layer_of_their_own() {
    // A hidden node shares the lowest layer with the input.
    let shared = Substrate::from_parts(
        vec![
            Node::input(I0),
            Node::hidden(I1, Activation::Direct, 1.5),
            Node::output(O, Activation::Direct, 0.0),
        ],
        vec![Connection::new(I0, O, 2.0), Connection::new(I1, O, 1.0)],
    )
    .unwrap();
    let network = FeedForwardTranslator
        .translate(&NeatTranscriber.transcribe(&shared).unwrap())
        .unwrap();
    assert_eq!(network.input_count(), 1);
    assert_eq!(network.activate(&array![[1.0], [-1.0]]).unwrap(), array![[3.5], [-0.5]]);

    // Inputs spread over two layers, one of them above a hidden node.
    let late_input = Position::planar(0.5, 0.0);
    let low_hidden = Position::planar(0.25, 0.5);
    let spread = Substrate::from_parts(
        vec![
            Node::input(I0),
            Node::hidden(low_hidden, Activation::Direct, 0.0),
            Node::input(late_input),
            Node::output(O, Activation::Direct, 0.0),
        ],
        vec![
            Connection::new(I0, low_hidden, 2.0),
            Connection::new(low_hidden, O, 1.0),
            Connection::new(late_input, O, 3.0),
        ],
    )
    .unwrap();
    let network = FeedForwardTranslator
        .translate(&NeatTranscriber.transcribe(&spread).unwrap())
        .unwrap();
    assert_eq!(network.input_count(), 2);
    assert_eq!(network.depth(), 4);
    let outputs = network.activate(&array![[1.0, 1.0], [0.5, -1.0]]).unwrap();
    assert_eq!(outputs, array![[5.0], [-2.0]]);
}
