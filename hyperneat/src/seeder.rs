use crate::config::{HyperNeatConfig, Inspection};
use crate::inspection::LEO;
use crate::transcriber::CPPN_INPUTS;

use evoneat::genomics::{spread, NeatSeeder, Seeder, SeederConfig};
use evoneat::substrate::{Activation, Connection, Node, Position};
use evoneat::{Error, Genome, RandomSource};

use std::num::NonZeroUsize;

/// Layer of the hidden nodes added for locality seeding.
const LOCALITY_LAYER: f32 = 0.5;

/// Seeds CPPN genomes for the [`HyperNeatTranscriber`].
///
/// Seeds have [`CPPN_INPUTS`] inputs and one output per
/// column read by the inspection. With link expression, each
/// enabled locality axis adds a hidden Gauss node fed by the
/// source coordinate (weight 1) and the target coordinate
/// (weight -1) along that axis, feeding the link-expression
/// output with weight 1. Connections between nearby nodes are
/// thus expressed first.
///
/// [`HyperNeatTranscriber`]: crate::HyperNeatTranscriber
#[derive(Clone, Debug)]
pub struct CppnSeeder {
    seeder: NeatSeeder,
    config: HyperNeatConfig,
}

impl CppnSeeder {
    /// Overrides the input and output counts of `seeder`.
    ///
    /// # Errors
    /// Returns an error if either configuration is invalid.
    pub fn new(seeder: SeederConfig, config: HyperNeatConfig) -> Result<CppnSeeder, Error> {
        config.validate()?;
        let outputs = config.inspection.output_count();
        let seeder = NeatSeeder::new(SeederConfig {
            num_inputs: NonZeroUsize::new(CPPN_INPUTS).unwrap_or(NonZeroUsize::MIN),
            num_outputs: NonZeroUsize::new(outputs).unwrap_or(NonZeroUsize::MIN),
            ..seeder
        })?;
        Ok(CppnSeeder { seeder, config })
    }
}

impl Seeder for CppnSeeder {
    /// # Examples
    /// ```
    /// use evoneat::RandomSource;
    /// use evoneat::genomics::{Seeder, SeederConfig};
    /// use hyperneat::{CppnSeeder, HyperNeatConfig, Locality};
    ///
    /// let seeder = CppnSeeder::new(SeederConfig::zero(), HyperNeatConfig {
    ///     locality: Locality { x: true, ..Locality::default() },
    ///     ..HyperNeatConfig::zero()
    /// }).unwrap();
    /// let genome = seeder.seed(&mut RandomSource::seeded(0)).unwrap();
    ///
    /// assert_eq!(genome.encoded.inputs().count(), 8);
    /// assert_eq!(genome.encoded.outputs().count(), 3);
    /// assert_eq!(genome.encoded.hidden().count(), 1);
    /// ```
    fn seed(&self, rng: &mut RandomSource) -> Result<Genome, Error> {
        let mut genome = self.seeder.seed(rng)?;
        if self.config.inspection != Inspection::LinkExpression {
            return Ok(genome);
        }
        let axes: Vec<usize> = self.config.locality.axes().collect();
        let inputs: Vec<Position> = genome.encoded.inputs().map(Node::position).collect();
        let leo = genome.encoded.outputs().nth(LEO).map(Node::position);
        let leo = match leo {
            Some(position) => position,
            None => return Ok(genome),
        };
        for (k, &axis) in axes.iter().enumerate() {
            let gauss = Position::planar(LOCALITY_LAYER, spread(k, axes.len()));
            genome
                .encoded
                .add_node(Node::hidden(gauss, Activation::Gauss, 0.0))?;
            genome
                .encoded
                .add_conn(Connection::new(inputs[axis], gauss, 1.0))?;
            genome
                .encoded
                .add_conn(Connection::new(inputs[axis + 4], gauss, -1.0))?;
            genome.encoded.add_conn(Connection::new(gauss, leo, 1.0))?;
        }
        Ok(genome)
    }
}
