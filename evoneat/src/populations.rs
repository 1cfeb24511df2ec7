//! A Population is a collection of genomes, grouped into
//! species. This module holds the population-level stages of
//! a generation: seeding, speciation, selection and update.
mod config;
pub mod logging;
mod populator;
mod selector;
mod speciator;
mod species;
mod updater;

pub use config::{PopulatorConfig, SelectorConfig, SpeciatorConfig};
pub use populator::Populator;
pub use selector::{rank, RankSelector, Selection, Selector};
pub use speciator::Speciator;
pub use species::Species;
pub use updater::Updater;

use crate::genome::{Comparison, Genome, GenomeId, SpeciesId};

use serde::{Deserialize, Serialize};

use std::cmp::Ordering;

/// A generation of genomes and the species they belong to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub generation: usize,
    pub genomes: Vec<Genome>,
    /// Species in order of creation.
    pub species: Vec<Species>,
}

impl Population {
    /// Returns an unspeciated generation-0 population.
    pub fn new(genomes: Vec<Genome>) -> Population {
        Population {
            generation: 0,
            genomes,
            species: vec![],
        }
    }

    /// Returns the best genome by fitness (ties broken by
    /// lower complexity, then lower id), if any.
    ///
    /// # Examples
    /// ```
    /// use evoneat::Genome;
    /// use evoneat::populations::Population;
    /// use evoneat::substrate::Substrate;
    ///
    /// let mut genomes: Vec<Genome> = (1..=3)
    ///     .map(|id| Genome::new(id, Substrate::new(), vec![]))
    ///     .collect();
    /// genomes[1].fitness = 2.0;
    /// genomes[2].fitness = 2.0;
    ///
    /// let population = Population::new(genomes);
    /// assert_eq!(population.champion().map(|g| g.id), Some(2));
    /// ```
    pub fn champion(&self) -> Option<&Genome> {
        self.best(Comparison::Fitness)
    }

    /// Returns the best genome under `comparison`.
    pub fn best(&self, comparison: Comparison) -> Option<&Genome> {
        self.genomes.iter().min_by(|a, b| better(a, b, comparison))
    }

    pub fn genome(&self, id: GenomeId) -> Option<&Genome> {
        self.genomes.iter().find(|g| g.id == id)
    }

    pub fn species(&self, id: SpeciesId) -> Option<&Species> {
        self.species.iter().find(|s| s.id() == id)
    }

    /// Genomes assigned to species `id`.
    pub fn members(&self, id: SpeciesId) -> impl Iterator<Item = &Genome> {
        self.genomes
            .iter()
            .filter(move |g| g.species_id == Some(id))
    }

    /// Mean complexity of the genomes' encoded substrates.
    pub fn mean_complexity(&self) -> f32 {
        if self.genomes.is_empty() {
            return 0.0;
        }
        let total: usize = self.genomes.iter().map(Genome::complexity).sum();
        total as f32 / self.genomes.len() as f32
    }

    /// Highest genome id present, or 0.
    pub fn max_genome_id(&self) -> GenomeId {
        self.genomes.iter().map(|g| g.id).max().unwrap_or(0)
    }

    /// Highest species id present, or 0.
    pub fn max_species_id(&self) -> SpeciesId {
        let assigned = self.genomes.iter().filter_map(|g| g.species_id);
        self.species
            .iter()
            .map(Species::id)
            .chain(assigned)
            .max()
            .unwrap_or(0)
    }

    pub fn is_solved(&self) -> bool {
        self.genomes.iter().any(|g| g.solved)
    }
}

/// Orders genomes best first: higher score under `comparison`,
/// then lower complexity, then lower id.
pub(crate) fn better(a: &Genome, b: &Genome, comparison: Comparison) -> Ordering {
    comparison
        .value(b)
        .total_cmp(&comparison.value(a))
        .then_with(|| a.complexity().cmp(&b.complexity()))
        .then_with(|| a.id.cmp(&b.id))
}
