use evoneat::experiment::{
    Cancellation, Experiment, ExperimentConfig, IterationLimit, SolutionFound,
};
use evoneat::genomics::NeatSeeder;
use evoneat::populations::logging::{EvolutionLogger, ReportingLevel, Stats};
use evoneat::{Error, Evaluation, GenomeRecord, NeatTranscriber, Parallel, Phenome};
use evoneat_nn::{FeedForwardNetwork, FeedForwardTranslator};

use log::{error, info};
use ndarray::array;

use std::num::NonZeroUsize;

/// Outputs within this distance of the target count as correct.
const ERROR_MARGIN: f32 = 0.5;
const GENERATIONS: usize = 300;
const RUNS: u64 = 20;

fn evaluate_xor(phenome: &Phenome<FeedForwardNetwork>) -> Evaluation {
    let inputs = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
    let expected = [0.0, 1.0, 1.0, 0.0];
    let outputs = match phenome.network.activate(&inputs) {
        Ok(outputs) => outputs,
        Err(e) => return Evaluation::failed(phenome.id, e.to_string()),
    };
    let errors: Vec<f32> = expected
        .iter()
        .zip(outputs.column(0))
        .map(|(e, o)| (e - o).abs())
        .collect();
    let fitness = (4.0 - errors.iter().sum::<f32>()).powi(2);
    Evaluation::new(phenome.id, fitness).solved(errors.iter().all(|e| *e < ERROR_MARGIN))
}

fn default_config() -> ExperimentConfig {
    let mut config = ExperimentConfig::zero();
    config.seeder.num_inputs = NonZeroUsize::new(2).unwrap_or(NonZeroUsize::MIN);
    config.seeder.bias_power = 1.0;
    config.seeder.max_bias = 5.0;
    config.seeder.weight_power = 1.0;
    config.seeder.max_weight = 5.0;
    config.populator.population_size = NonZeroUsize::new(150).unwrap_or(NonZeroUsize::MIN);
    config.crosser.enable_probability = 0.25;
    config.selector.mutate_only_probability = 0.25;
    config.selector.interspecies_mate_probability = 0.001;
    config.selector.elitism = 1;
    config.selector.survival_rate = 0.2;
    config.selector.species_decay_rate = 0.067;
    config.speciator.compatibility_threshold = 3.0;
    config.speciator.compatibility_modifier = 0.3;
    config.speciator.target_species = 10;
    config.distancer.nodes_coefficient = 1.0;
    config.distancer.activation_coefficient = 1.0;
    config.distancer.conns_coefficient = 1.0;
    config.distancer.weight_coefficient = 0.4;
    config.complexify.add_node_probability = 0.03;
    config.complexify.add_conn_probability = 0.05;
    config.complexify.weight_power = 2.5;
    config.complexify.max_weight = 5.0;
    config.complexify.bias_power = 1.0;
    config.complexify.max_bias = 5.0;
    config.complexify.hidden_activation = evoneat::substrate::Activation::SteepenedSigmoid;
    config.weight.mutate_weight_probability = 0.9;
    config.weight.replace_weight_probability = 0.2;
    config.weight.weight_power = 2.5;
    config.weight.max_weight = 5.0;
    config.bias.mutate_bias_probability = 0.9;
    config.bias.replace_bias_probability = 0.2;
    config.bias.bias_power = 1.0;
    config.bias.max_bias = 5.0;
    config
}

/// Reads the configuration from the RON file named by the
/// first argument, if any.
fn load_config() -> Result<ExperimentConfig, Error> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| evoneat::ConfigError::Parse(format!("{}: {}", path, e)))?;
            ExperimentConfig::from_ron(&text)
        }
        None => Ok(default_config()),
    }
}

/// Runs one experiment, returning the generation in which
/// XOR was solved, if it was.
fn solve(config: &ExperimentConfig, seed: u64) -> Result<Option<usize>, Error> {
    let config = ExperimentConfig {
        seed: Some(config.seed.unwrap_or(0) + seed),
        ..config.clone()
    };
    let logger = EvolutionLogger::new(ReportingLevel::NoGenomes);
    let mut experiment = Experiment::new(
        &config,
        NeatTranscriber,
        FeedForwardTranslator,
        Parallel::new(evaluate_xor),
    )?;
    experiment.subscribe(IterationLimit(GENERATIONS));
    experiment.subscribe(SolutionFound);
    experiment.subscribe(logger.clone());

    let seeder = NeatSeeder::new(config.seeder.clone())?;
    let population = experiment.populate(&seeder)?;
    let population = experiment.run(population, &Cancellation::new())?;

    if let Some(last) = logger.logs().last() {
        info!("run {} ended with\n{}", seed, last);
    }
    match population.genomes.iter().find(|g| g.solved) {
        Some(solver) => {
            let record = GenomeRecord::from(solver);
            match ron::to_string(&record) {
                Ok(text) => info!("solution: {}", text),
                Err(e) => error!("could not serialize solution: {}", e),
            }
            Ok(Some(population.generation))
        }
        None => Ok(None),
    }
}

fn main() {
    env_logger::init();
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut generations = vec![];
    for seed in 0..RUNS {
        match solve(&config, seed) {
            Ok(solved) => generations.push(solved),
            Err(e) => {
                eprintln!("{}", e);
                generations.push(None);
            }
        }
    }

    println!(
        "Successful run generation count {:?}, {}% failure rate over {} runs",
        Stats::from(generations.iter().filter_map(|g| g.map(|g| g as f32))),
        generations.iter().filter(|g| g.is_none()).count() as f32 * 100.0 / RUNS as f32,
        RUNS
    );
}
