use super::{Population, PopulatorConfig};
use crate::errors::Error;
use crate::genome::GenomeId;
use crate::genomics::Seeder;
use crate::rng::RandomSource;

/// Builds the first generation from a seeder.
#[derive(Clone, Debug)]
pub struct Populator {
    config: PopulatorConfig,
}

impl Populator {
    pub fn new(config: PopulatorConfig) -> Populator {
        Populator { config }
    }

    pub fn config(&self) -> &PopulatorConfig {
        &self.config
    }

    /// Seeds `population_size` genomes, each from its own
    /// forked random source, with ids `1..=population_size`.
    ///
    /// # Examples
    /// ```
    /// use evoneat::RandomSource;
    /// use evoneat::genomics::{NeatSeeder, SeederConfig};
    /// use evoneat::populations::{Populator, PopulatorConfig};
    /// use std::num::NonZeroUsize;
    ///
    /// let populator = Populator::new(PopulatorConfig {
    ///     population_size: NonZeroUsize::new(10).unwrap(),
    /// });
    /// let seeder = NeatSeeder::new(SeederConfig::zero()).unwrap();
    /// let population = populator.populate(&seeder, &mut RandomSource::seeded(0)).unwrap();
    ///
    /// assert_eq!(population.genomes.len(), 10);
    /// assert_eq!(population.max_genome_id(), 10);
    /// ```
    pub fn populate(
        &self,
        seeder: &dyn Seeder,
        rng: &mut RandomSource,
    ) -> Result<Population, Error> {
        let genomes = (1..=self.config.population_size.get() as GenomeId)
            .map(|id| {
                let mut genome = seeder.seed(&mut rng.fork())?;
                genome.id = id;
                Ok(genome)
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Population::new(genomes))
    }
}
