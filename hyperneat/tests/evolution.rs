use evoneat::experiment::{Cancellation, Experiment, ExperimentConfig, IterationLimit};
use evoneat::genomics::ActivationConfig;
use evoneat::substrate::{Activation, Node, Position, Substrate};
use evoneat::{Evaluation, Phenome, Serial};
use evoneat_nn::{FeedForwardNetwork, FeedForwardTranslator};
use hyperneat::{CppnSeeder, HyperNeatConfig, HyperNeatTranscriber, Locality};

use ndarray::array;
use std::num::NonZeroUsize;

fn template() -> Substrate {
    let mut nodes: Vec<Node> = (0..3)
        .map(|i| Node::input(Position::planar(0.0, i as f32 - 1.0)))
        .collect();
    nodes.push(Node::hidden(Position::planar(0.5, -0.5), Activation::Tanh, 0.0));
    nodes.push(Node::hidden(Position::planar(0.5, 0.5), Activation::Tanh, 0.0));
    nodes.push(Node::output(Position::planar(1.0, 0.0), Activation::Sigmoid, 0.0));
    Substrate::from_parts(nodes, vec![]).unwrap()
}

fn evaluate(phenome: &Phenome<FeedForwardNetwork>) -> Evaluation {
    let inputs = array![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
    match phenome.network.activate(&inputs) {
        Ok(outputs) => {
            let error = outputs[[0, 0]] + (1.0 - outputs[[1, 0]]);
            Evaluation::new(phenome.id, 2.0 - error)
        }
        Err(e) => Evaluation::failed(phenome.id, e.to_string()),
    }
}

fn config() -> ExperimentConfig {
    let mut config = ExperimentConfig::zero();
    config.seed = Some(11);
    config.seeder.weight_power = 1.0;
    config.seeder.max_weight = 3.0;
    config.populator.population_size = NonZeroUsize::new(20).unwrap();
    config.selector.survival_rate = 0.3;
    config.selector.elitism = 1;
    config.selector.mutate_only_probability = 0.25;
    config.selector.species_decay_rate = 0.1;
    config.speciator.compatibility_threshold = 2.0;
    config.speciator.compatibility_modifier = 0.2;
    config.speciator.target_species = 3;
    config.distancer.nodes_coefficient = 1.0;
    config.distancer.conns_coefficient = 1.0;
    config.distancer.weight_coefficient = 0.5;
    config.complexify.add_node_probability = 0.1;
    config.complexify.add_conn_probability = 0.2;
    config.complexify.weight_power = 1.0;
    config.complexify.max_weight = 3.0;
    config.complexify.hidden_activation = Activation::Sin;
    config.weight.mutate_weight_probability = 0.8;
    config.weight.replace_weight_probability = 0.1;
    config.weight.weight_power = 0.5;
    config.weight.max_weight = 3.0;
    config.activation = Some(ActivationConfig {
        replace_activation_probability: 0.1,
        activations: vec![Activation::Sin, Activation::Gauss, Activation::Tanh],
    });
    config
}

#[test]
fn hyperneat_experiment_runs_and_replays() {
    let hyperneat = HyperNeatConfig {
        weight_power: 3.0,
        bias_power: 1.0,
        locality: Locality {
            x: true,
            ..Locality::default()
        },
        ..HyperNeatConfig::zero()
    };
    let run = || {
        let config = config();
        let transcriber = HyperNeatTranscriber::new(template(), hyperneat.clone()).unwrap();
        let mut experiment =
            Experiment::new(&config, transcriber, FeedForwardTranslator, Serial::new(evaluate))
                .unwrap();
        experiment.subscribe(IterationLimit(4));
        let seeder = CppnSeeder::new(config.seeder.clone(), hyperneat.clone()).unwrap();
        let population = experiment.populate(&seeder).unwrap();
        experiment.run(population, &Cancellation::new()).unwrap()
    };

    let first = run();
    assert_eq!(first.generation, 4);
    assert_eq!(first.genomes.len(), 20);
    let positions: Vec<Position> = template().nodes().iter().map(Node::position).collect();
    for genome in &first.genomes {
        let decoded: Vec<Position> = genome.decoded.nodes().iter().map(Node::position).collect();
        assert_eq!(decoded, positions);
    }
    assert_eq!(first, run());
}
