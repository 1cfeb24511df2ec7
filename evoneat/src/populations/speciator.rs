use super::{Population, Species, SpeciatorConfig};
use crate::errors::{ConfigError, Error};
use crate::genome::SpeciesId;
use crate::genomics::{compatibility_distance, DistancerConfig};

use ahash::{AHashMap, AHashSet};
use log::debug;

/// Partitions a population into species, adapting the
/// compatibility threshold towards a target species count.
#[derive(Clone, Debug)]
pub struct Speciator {
    config: SpeciatorConfig,
    distancer: DistancerConfig,
    threshold: f32,
}

impl Speciator {
    /// # Errors
    /// Returns an error if either configuration is invalid,
    /// notably [`ConfigError::NegativeThreshold`].
    pub fn new(config: SpeciatorConfig, distancer: DistancerConfig) -> Result<Speciator, Error> {
        config.validate()?;
        distancer.validate()?;
        Ok(Speciator {
            threshold: config.compatibility_threshold,
            config,
            distancer,
        })
    }

    /// The current compatibility threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn distancer(&self) -> &DistancerConfig {
        &self.distancer
    }

    /// Assigns every genome of `population` to a species.
    ///
    /// Genomes already belonging to a live species keep it.
    /// Others join the first species (in creation order) whose
    /// example lies under the compatibility threshold, or found
    /// a new species with an id drawn from `next_species_id`.
    /// Species left without members are dropped.
    ///
    /// # Examples
    /// ```
    /// use evoneat::Genome;
    /// use evoneat::genomics::DistancerConfig;
    /// use evoneat::populations::{Population, Speciator, SpeciatorConfig};
    /// use evoneat::substrate::Substrate;
    ///
    /// let mut speciator = Speciator::new(
    ///     SpeciatorConfig { compatibility_threshold: 1.0, ..SpeciatorConfig::zero() },
    ///     DistancerConfig::zero(),
    /// ).unwrap();
    /// let genomes = (1..=4).map(|id| Genome::new(id, Substrate::new(), vec![])).collect();
    /// let mut population = Population::new(genomes);
    ///
    /// let mut next_species_id = 0;
    /// speciator.speciate(&mut population, &mut next_species_id).unwrap();
    /// assert_eq!(population.species.len(), 1);
    /// assert!(population.genomes.iter().all(|g| g.species_id == Some(1)));
    /// ```
    pub fn speciate(
        &mut self,
        population: &mut Population,
        next_species_id: &mut SpeciesId,
    ) -> Result<(), Error> {
        if self.threshold < 0.0 {
            return Err(ConfigError::NegativeThreshold(self.threshold).into());
        }

        let mut buckets: AHashMap<SpeciesId, usize> =
            population.species.iter().map(|s| (s.id(), 0)).collect();
        let mut receiving: AHashSet<SpeciesId> = AHashSet::new();

        let Population {
            genomes, species, ..
        } = population;
        for genome in genomes.iter_mut() {
            if let Some(count) = genome.species_id.and_then(|id| buckets.get_mut(&id)) {
                *count += 1;
                continue;
            }
            let compatible = species
                .iter()
                .find(|s| {
                    compatibility_distance(&s.example().encoded, &genome.encoded, &self.distancer)
                        < self.threshold
                })
                .map(Species::id);
            let id = match compatible {
                Some(id) => id,
                None => {
                    *next_species_id += 1;
                    let id = *next_species_id;
                    genome.species_id = Some(id);
                    species.push(Species::new(id, genome.clone()));
                    id
                }
            };
            genome.species_id = Some(id);
            *buckets.entry(id).or_insert(0) += 1;
            receiving.insert(id);
        }

        species.retain(|s| buckets.get(&s.id()).map_or(false, |count| *count > 0));
        self.adapt(receiving.len());
        debug!(
            "{} species, {} receiving new genomes, threshold {:.3}",
            species.len(),
            receiving.len(),
            self.threshold
        );
        Ok(())
    }

    fn adapt(&mut self, receiving: usize) {
        let target = self.config.target_species;
        if target == 0 {
            return;
        }
        let modifier = self.config.compatibility_modifier;
        if receiving > target {
            self.threshold += modifier;
        } else if receiving < target {
            self.threshold = (self.threshold - modifier).max(modifier);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Genome;
    use crate::substrate::{Node, Position, Substrate};

    /// Genome with `n` input nodes, so that genomes of
    /// different sizes are `|n - m|` apart.
    fn genome(id: u64, n: usize) -> Genome {
        let nodes = (0..n)
            .map(|i| Node::input(Position::planar(0.0, i as f32)))
            .collect();
        Genome::new(id, Substrate::from_parts(nodes, vec![]).unwrap(), vec![])
    }

    fn speciator(target_species: usize) -> Speciator {
        Speciator::new(
            SpeciatorConfig {
                compatibility_threshold: 1.0,
                compatibility_modifier: 0.5,
                target_species,
            },
            DistancerConfig {
                nodes_coefficient: 1.0,
                ..DistancerConfig::zero()
            },
        )
        .unwrap()
    }

    #[test]
    fn threshold_grows_with_too_many_species() {
        let mut speciator = speciator(2);
        let mut population =
            Population::new(vec![genome(1, 1), genome(2, 3), genome(3, 5), genome(4, 5)]);
        let mut next = 0;
        speciator.speciate(&mut population, &mut next).unwrap();
        assert_eq!(population.species.len(), 3);
        assert_eq!(speciator.threshold(), 1.5);
        assert_eq!(next, 3);
    }

    #[test]
    fn threshold_shrinks_but_not_below_modifier() {
        let mut speciator = speciator(2);
        let mut population = Population::new(vec![genome(1, 2), genome(2, 2)]);
        let mut next = 0;
        speciator.speciate(&mut population, &mut next).unwrap();
        assert_eq!(population.species.len(), 1);
        assert_eq!(speciator.threshold(), 0.5);
        speciator.speciate(&mut population, &mut next).unwrap();
        assert_eq!(speciator.threshold(), 0.5);
    }

    #[test]
    fn membership_is_sticky_and_stable() {
        let mut speciator = speciator(0);
        let mut population = Population::new(vec![genome(1, 1), genome(2, 3), genome(3, 3)]);
        let mut next = 0;
        speciator.speciate(&mut population, &mut next).unwrap();
        let first: Vec<_> = population.genomes.iter().map(|g| g.species_id).collect();
        speciator.speciate(&mut population, &mut next).unwrap();
        let second: Vec<_> = population.genomes.iter().map(|g| g.species_id).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![Some(1), Some(2), Some(2)]);
        assert_eq!(speciator.threshold(), 1.0);
    }

    #[test]
    fn empty_species_are_dropped() {
        let mut speciator = speciator(0);
        let mut population = Population::new(vec![genome(1, 1), genome(2, 4)]);
        let mut next = 0;
        speciator.speciate(&mut population, &mut next).unwrap();
        assert_eq!(population.species.len(), 2);

        population.genomes.remove(1);
        speciator.speciate(&mut population, &mut next).unwrap();
        let ids: Vec<_> = population.species.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn unknown_species_ids_are_reassigned() {
        let mut speciator = speciator(0);
        let mut population = Population::new(vec![genome(1, 1)]);
        population.genomes[0].species_id = Some(77);
        let mut next = 0;
        speciator.speciate(&mut population, &mut next).unwrap();
        assert_eq!(population.genomes[0].species_id, Some(1));
    }
}
