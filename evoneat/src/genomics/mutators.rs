//! In-place modifications of a genome's encoded substrate.
//!
//! Mutators compose into an ordered [`Mutators`] pipeline.
//! A mutator reports whether it changed the genome's
//! structure, and the first structural change ends the
//! pipeline for that genome: a genome receives at most one
//! structural change per generation.
mod activation;
mod complexify;
mod parametric;
mod phased;
mod simplify;

pub use activation::ActivationMutator;
pub use complexify::Complexify;
pub use parametric::{BiasMutator, TraitMutator, WeightMutator};
pub use phased::{Phase, Phased};
pub use simplify::{Pruning, Simplify};

use crate::errors::Error;
use crate::genome::Genome;
use crate::populations::{Population, Selector};
use crate::rng::RandomSource;

/// An operator that modifies a genome in place.
pub trait Mutator: Send + Sync {
    /// Mutates `genome`, returning `true` if nodes or
    /// connections were added or removed.
    fn mutate(&self, rng: &mut RandomSource, genome: &mut Genome) -> Result<bool, Error>;

    /// Called once per generation, before any offspring is
    /// produced, with the population the offspring will
    /// come from.
    fn prepare(&mut self, _population: &Population, _selector: &mut dyn Selector) {}
}

/// An ordered pipeline of mutators, short-circuited by the
/// first structural change.
///
/// # Examples
/// ```
/// use evoneat::{Genome, RandomSource};
/// use evoneat::genomics::{Mutator, Mutators, TraitMutator, TraitConfig};
/// use evoneat::substrate::Substrate;
///
/// let mutators = Mutators::new().with(TraitMutator::new(TraitConfig {
///     mutate_trait_probability: 1.0,
///     replace_trait_probability: 1.0,
/// }).unwrap());
///
/// let mut genome = Genome::new(1, Substrate::new(), vec![2.0]);
/// let structural = mutators.mutate(&mut RandomSource::seeded(0), &mut genome).unwrap();
/// assert!(!structural);
/// assert!(genome.traits[0] < 1.0);
/// ```
#[derive(Default)]
pub struct Mutators {
    pipeline: Vec<Box<dyn Mutator>>,
}

impl Mutators {
    pub fn new() -> Mutators {
        Mutators::default()
    }

    /// Appends a mutator to the end of the pipeline.
    pub fn with(mut self, mutator: impl Mutator + 'static) -> Mutators {
        self.push(mutator);
        self
    }

    pub fn push(&mut self, mutator: impl Mutator + 'static) {
        self.pipeline.push(Box::new(mutator));
    }

    pub fn len(&self) -> usize {
        self.pipeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipeline.is_empty()
    }
}

impl Mutator for Mutators {
    fn mutate(&self, rng: &mut RandomSource, genome: &mut Genome) -> Result<bool, Error> {
        for mutator in &self.pipeline {
            if mutator.mutate(rng, genome)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn prepare(&mut self, population: &Population, selector: &mut dyn Selector) {
        for mutator in &mut self.pipeline {
            mutator.prepare(population, selector);
        }
    }
}
