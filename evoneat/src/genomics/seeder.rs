use super::SeederConfig;
use crate::errors::Error;
use crate::genome::Genome;
use crate::rng::RandomSource;
use crate::substrate::{Connection, Node, Position, Substrate};

/// Builds the genomes of the first generation.
pub trait Seeder: Send + Sync {
    /// Returns a new seed genome with id 0; the
    /// caller issues its real id.
    fn seed(&self, rng: &mut RandomSource) -> Result<Genome, Error>;
}

/// Seeds minimal NEAT networks: every input on layer 0,
/// every output on layer 1, and (up to the disconnect rate)
/// every input connected to every output.
#[derive(Clone, Debug)]
pub struct NeatSeeder {
    config: SeederConfig,
}

impl NeatSeeder {
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(config: SeederConfig) -> Result<NeatSeeder, Error> {
        config.validate()?;
        Ok(NeatSeeder { config })
    }

    pub fn config(&self) -> &SeederConfig {
        &self.config
    }
}

/// Horizontal coordinate of the `i`th of `n` nodes
/// spread evenly over `[0, 1]`.
pub fn spread(i: usize, n: usize) -> f32 {
    if n <= 1 {
        0.5
    } else {
        i as f32 / (n - 1) as f32
    }
}

impl Seeder for NeatSeeder {
    /// # Examples
    /// ```
    /// use evoneat::RandomSource;
    /// use evoneat::genomics::{NeatSeeder, Seeder, SeederConfig};
    /// use evoneat::substrate::Position;
    /// use std::num::NonZeroUsize;
    ///
    /// let seeder = NeatSeeder::new(SeederConfig {
    ///     num_inputs: NonZeroUsize::new(2).unwrap(),
    ///     ..SeederConfig::zero()
    /// }).unwrap();
    /// let genome = seeder.seed(&mut RandomSource::seeded(1)).unwrap();
    ///
    /// assert_eq!(genome.encoded.nodes()[2].position(), Position::planar(1.0, 0.5));
    /// assert_eq!(genome.encoded.conns().len(), 2);
    /// ```
    fn seed(&self, rng: &mut RandomSource) -> Result<Genome, Error> {
        let config = &self.config;
        let (n_in, n_out) = (config.num_inputs.get(), config.num_outputs.get());

        let inputs: Vec<Position> = (0..n_in)
            .map(|i| Position::planar(0.0, spread(i, n_in)))
            .collect();
        let outputs: Vec<Position> = (0..n_out)
            .map(|i| Position::planar(1.0, spread(i, n_out)))
            .collect();

        let mut nodes: Vec<Node> = inputs.iter().copied().map(Node::input).collect();
        for output in &outputs {
            let bias = rng.clipped_normal(config.bias_power, config.max_bias);
            nodes.push(Node::output(*output, config.output_activation, bias));
        }

        let mut conns = vec![];
        for input in &inputs {
            for output in &outputs {
                if rng.gen_bool(config.disconnect_rate) {
                    continue;
                }
                let weight = rng.clipped_normal(config.weight_power, config.max_weight);
                conns.push(Connection::new(*input, *output, weight));
            }
        }

        let traits = (0..config.num_traits).map(|_| rng.uniform()).collect();
        Ok(Genome::new(0, Substrate::from_parts(nodes, conns)?, traits))
    }
}
