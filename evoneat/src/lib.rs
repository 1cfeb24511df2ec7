//! A generational implementation of NeuroEvolution of Augmenting
//! Topologies, following the 2002 paper:
//! <http://nn.cs.utexas.edu/keyword?stanley:ec02>
//!
//! Genomes are position-keyed substrates: every node sits at a
//! point `(layer, x, y, z)` and connections always run towards
//! higher layers, so every network is feed-forward and genes from
//! different genomes line up by position instead of by innovation
//! number. The same machinery drives indirect encodings, as done
//! by the `hyperneat` crate.
//!
//! The engine is representation-agnostic at three seams: a
//! [`Transcriber`] decodes a genome's substrate, a [`Translator`]
//! builds a network from the decoded substrate, and a [`Searcher`]
//! evaluates the resulting [`Phenome`]s. A layered matrix network
//! is supplied by the `evoneat-nn` crate.
//!
//! # Example usage: Evolution of XOR function approximator, using `evoneat-nn`
//! ```
//! use evoneat::experiment::{Cancellation, Experiment, ExperimentConfig, IterationLimit};
//! use evoneat::genomics::NeatSeeder;
//! use evoneat::{Evaluation, NeatTranscriber, Parallel, Phenome};
//! use evoneat_nn::{FeedForwardNetwork, FeedForwardTranslator};
//! use ndarray::array;
//! use std::num::NonZeroUsize;
//!
//! fn evaluate_xor(phenome: &Phenome<FeedForwardNetwork>) -> Evaluation {
//!     let inputs = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
//!     let expected = [0.0, 1.0, 1.0, 0.0];
//!     match phenome.network.activate(&inputs) {
//!         Ok(outputs) => {
//!             let errors: Vec<f32> = expected
//!                 .iter()
//!                 .zip(outputs.column(0))
//!                 .map(|(e, o)| (e - o).abs())
//!                 .collect();
//!             let fitness = (4.0 - errors.iter().sum::<f32>()).powi(2);
//!             Evaluation::new(phenome.id, fitness).solved(errors.iter().all(|e| *e < 0.5))
//!         }
//!         Err(e) => Evaluation::failed(phenome.id, e.to_string()),
//!     }
//! }
//!
//! let mut config = ExperimentConfig::zero();
//! config.seed = Some(42);
//! config.seeder.num_inputs = NonZeroUsize::new(2).unwrap();
//! config.seeder.weight_power = 1.0;
//! config.seeder.max_weight = 5.0;
//! config.populator.population_size = NonZeroUsize::new(50).unwrap();
//! config.selector.survival_rate = 0.2;
//! config.selector.elitism = 1;
//! config.speciator.compatibility_threshold = 3.0;
//! config.distancer.nodes_coefficient = 1.0;
//! config.distancer.conns_coefficient = 1.0;
//! config.distancer.weight_coefficient = 0.4;
//! config.complexify.add_node_probability = 0.03;
//! config.complexify.add_conn_probability = 0.05;
//! config.complexify.weight_power = 1.0;
//! config.complexify.max_weight = 5.0;
//! config.weight.mutate_weight_probability = 0.8;
//! config.weight.replace_weight_probability = 0.1;
//! config.weight.weight_power = 0.5;
//! config.weight.max_weight = 5.0;
//!
//! let mut experiment = Experiment::new(
//!     &config,
//!     NeatTranscriber,
//!     FeedForwardTranslator,
//!     Parallel::new(evaluate_xor),
//! )
//! .unwrap();
//! experiment.subscribe(IterationLimit(5));
//!
//! let seeder = NeatSeeder::new(config.seeder.clone()).unwrap();
//! let population = experiment.populate(&seeder).unwrap();
//! let population = experiment.run(population, &Cancellation::new()).unwrap();
//!
//! assert_eq!(population.generation, 5);
//! assert_eq!(population.genomes.len(), 50);
//! assert!(population.champion().unwrap().fitness > 0.0);
//! ```

mod errors;
pub mod experiment;
mod genome;
pub mod genomics;
mod networks;
pub mod populations;
mod rng;
mod search;
pub mod substrate;
mod transcription;

pub use errors::{
    ConfigError, Error, GenerationError, GenomeFailure, Stage, StructuralError, VariationError,
};
pub use genome::{
    Comparison, Evaluation, EvaluationError, Genome, GenomeId, GenomeRecord, SpeciesId,
    MIN_FITNESS,
};
pub use networks::{Phenome, Translator};
pub use populations::Population;
pub use rng::RandomSource;
pub use search::{Evaluator, Parallel, Searcher, Serial};
pub use transcription::{NeatTranscriber, Transcriber};
