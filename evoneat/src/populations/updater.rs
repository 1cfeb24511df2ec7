use super::Population;
use crate::genome::{Evaluation, GenomeId};

use ahash::AHashMap;
use log::{debug, warn};

/// Applies evaluations to genomes and keeps track of
/// species improvement.
#[derive(Clone, Debug)]
pub struct Updater {
    species_decay_rate: f32,
}

impl Updater {
    pub fn new(species_decay_rate: f32) -> Updater {
        Updater {
            species_decay_rate: species_decay_rate.max(0.0),
        }
    }

    /// Copies each evaluation onto the genome with the same id.
    /// Genomes without an evaluation are reset to the minimum
    /// fitness; evaluations for unknown ids are ignored.
    ///
    /// Then, for every species: if its best member beats the
    /// recorded best fitness, the record, stagnation counter and
    /// decay are reset. Otherwise stagnation grows by one and
    /// decay by the decay rate, up to 1. Either way the champion
    /// becomes the species' best current member.
    ///
    /// # Examples
    /// ```
    /// use evoneat::{Evaluation, Genome};
    /// use evoneat::populations::{Population, Species, Updater};
    /// use evoneat::substrate::Substrate;
    ///
    /// let mut genome = Genome::new(1, Substrate::new(), vec![]);
    /// genome.species_id = Some(1);
    /// let mut population = Population::new(vec![genome.clone()]);
    /// population.species.push(Species::new(1, genome));
    ///
    /// let updater = Updater::new(0.25);
    /// updater.update(&mut population, &[Evaluation::new(1, 2.0)]);
    /// assert_eq!(population.species[0].champion(), Some(1));
    ///
    /// updater.update(&mut population, &[Evaluation::new(1, 2.0)]);
    /// assert_eq!(population.species[0].decay(), 0.25);
    /// assert_eq!(population.species[0].stagnation(), 1);
    /// ```
    pub fn update(&self, population: &mut Population, evaluations: &[Evaluation]) {
        let by_id: AHashMap<GenomeId, &Evaluation> =
            evaluations.iter().map(|e| (e.genome_id, e)).collect();
        for genome in &mut population.genomes {
            match by_id.get(&genome.id) {
                Some(evaluation) => {
                    if let Some(error) = &evaluation.error {
                        warn!("genome {}: {}", genome.id, error);
                    }
                    genome.apply(evaluation);
                }
                None => genome.reset(),
            }
        }

        let Population {
            genomes, species, ..
        } = population;
        for species in species.iter_mut() {
            let best = genomes
                .iter()
                .filter(|g| g.species_id == Some(species.id()))
                .max_by(|a, b| a.fitness.total_cmp(&b.fitness).then_with(|| b.id.cmp(&a.id)));
            let best = match best {
                Some(best) => best,
                None => continue,
            };
            if best.fitness > species.best_fitness {
                species.best_fitness = best.fitness;
                species.stagnation = 0;
                species.decay = 0.0;
                species.champion = Some(best.id);
            } else {
                species.stagnation += 1;
                species.decay = (species.decay + self.species_decay_rate).min(1.0);
                species.champion = Some(best.id);
            }
            debug!(
                "species {}: best {:.4}, stagnation {}, decay {:.2}",
                species.id(),
                species.best_fitness,
                species.stagnation,
                species.decay
            );
        }
    }
}
