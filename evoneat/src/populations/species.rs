use crate::genome::{Genome, GenomeId, SpeciesId};

use serde::{Deserialize, Serialize};

/// Species are groups of genomes within a compatibility
/// distance of a representative _example_, which is the
/// genome that founded the species.
///
/// A species accumulates decay for every generation in
/// which its best fitness does not improve. At a decay of
/// 1 the species is _stagnant_: it keeps its members but
/// receives no offspring.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Species {
    id: SpeciesId,
    example: Genome,
    pub(crate) champion: Option<GenomeId>,
    pub(crate) decay: f32,
    pub(crate) best_fitness: f32,
    pub(crate) stagnation: usize,
}

impl Species {
    /// Creates a new species founded by `example`.
    ///
    /// # Examples
    /// ```
    /// use evoneat::Genome;
    /// use evoneat::populations::Species;
    /// use evoneat::substrate::Substrate;
    ///
    /// let species = Species::new(3, Genome::new(1, Substrate::new(), vec![]));
    /// assert_eq!(species.id(), 3);
    /// assert_eq!(species.decay(), 0.0);
    /// assert!(!species.is_stagnant());
    /// ```
    pub fn new(id: SpeciesId, example: Genome) -> Species {
        Species {
            id,
            example,
            champion: None,
            decay: 0.0,
            best_fitness: 0.0,
            stagnation: 0,
        }
    }

    pub fn id(&self) -> SpeciesId {
        self.id
    }

    /// The representative used for distance comparisons.
    pub fn example(&self) -> &Genome {
        &self.example
    }

    /// Id of the genome holding the species' best fitness.
    pub fn champion(&self) -> Option<GenomeId> {
        self.champion
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn best_fitness(&self) -> f32 {
        self.best_fitness
    }

    /// Generations since the species last improved.
    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    pub fn is_stagnant(&self) -> bool {
        self.decay >= 1.0
    }

    /// Forgets accumulated decay and the recorded champion.
    pub(crate) fn restart(&mut self) {
        self.decay = 0.0;
        self.champion = None;
    }
}
