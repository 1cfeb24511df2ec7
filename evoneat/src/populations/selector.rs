use super::{better, Population, SelectorConfig};
use crate::errors::Error;
use crate::genome::{Comparison, Genome, SpeciesId};
use crate::rng::RandomSource;

use ahash::AHashMap;
use log::{debug, info};

use std::num::NonZeroUsize;

/// The outcome of selection, as indices into the
/// population's genomes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    /// Genomes carried over unchanged.
    pub continuing: Vec<usize>,
    /// Parents of each offspring (one or two each).
    pub groups: Vec<Vec<usize>>,
}

/// Chooses which genomes survive into the next
/// generation and which ones reproduce.
pub trait Selector: Send + Sync {
    /// Selects survivors and parents from an evaluated,
    /// speciated population. May reset species state.
    fn select(
        &self,
        rng: &mut RandomSource,
        population: &mut Population,
    ) -> Result<Selection, Error>;

    /// Forces (or stops forcing) single-parent offspring.
    /// Returns `false` if the selector has no such toggle.
    fn set_mutate_only(&mut self, _engaged: bool) -> bool {
        false
    }
}

/// Rank-based selection with species decay, elitism and
/// roulette parent sampling.
///
/// Genomes are ranked `n, n-1, ..., 1` from best to worst
/// (equal scores share the higher rank). Each non-stagnant
/// species receives offspring in proportion to the average
/// rank of its members, each rank scaled by `1 - decay`.
#[derive(Clone, Debug)]
pub struct RankSelector {
    config: SelectorConfig,
    population_size: NonZeroUsize,
    saved_mutate_only: Option<f32>,
}

impl RankSelector {
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: SelectorConfig,
        population_size: NonZeroUsize,
    ) -> Result<RankSelector, Error> {
        config.validate()?;
        Ok(RankSelector {
            config,
            population_size,
            saved_mutate_only: None,
        })
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    fn restart(&self, population: &mut Population, best: usize) -> Selection {
        info!(
            "every species is stagnant, restarting from genome {}",
            population.genomes[best].id
        );
        for species in &mut population.species {
            species.restart();
        }
        Selection {
            continuing: vec![best],
            groups: vec![vec![best]; self.population_size.get() - 1],
        }
    }
}

/// One species' view of the ranking.
struct Group {
    id: SpeciesId,
    decay: f32,
    /// Member indices, best first.
    members: Vec<usize>,
    adjusted_rank: f32,
}

impl Selector for RankSelector {
    fn select(
        &self,
        rng: &mut RandomSource,
        population: &mut Population,
    ) -> Result<Selection, Error> {
        if population.genomes.is_empty() {
            return Ok(Selection::default());
        }
        let comparison = self.config.comparison;
        let ranks = rank(&population.genomes, comparison);
        let mut order: Vec<usize> = (0..population.genomes.len()).collect();
        order.sort_by(|a, b| better(&population.genomes[*a], &population.genomes[*b], comparison));
        let best = order[0];

        let mut groups: Vec<Group> = population
            .species
            .iter()
            .map(|s| Group {
                id: s.id(),
                decay: s.decay(),
                members: vec![],
                adjusted_rank: 0.0,
            })
            .collect();
        let lookup: AHashMap<SpeciesId, usize> =
            groups.iter().enumerate().map(|(i, g)| (g.id, i)).collect();
        for &i in &order {
            let group = population.genomes[i]
                .species_id
                .and_then(|id| lookup.get(&id));
            if let Some(&g) = group {
                groups[g].members.push(i);
            }
        }
        groups.retain(|g| !g.members.is_empty());
        for group in &mut groups {
            let total: f32 = group
                .members
                .iter()
                .map(|&i| ranks[i] as f32 * (1.0 - group.decay))
                .sum();
            group.adjusted_rank = total / group.members.len() as f32;
        }

        let eligible: Vec<usize> = (0..groups.len())
            .filter(|&g| groups[g].decay < 1.0)
            .collect();
        if eligible.is_empty() {
            return Ok(self.restart(population, best));
        }

        let mut continuing = vec![];
        for &g in &eligible {
            continuing.extend(groups[g].members.iter().take(self.config.elitism));
        }
        if self.config.elitism > 0 && !continuing.contains(&best) {
            let top = comparison.value(&population.genomes[best]);
            if !continuing
                .iter()
                .any(|&i| comparison.value(&population.genomes[i]) == top)
            {
                continuing.push(best);
            }
        }
        let genomes = &population.genomes;
        continuing.sort_by(|a, b| better(&genomes[*a], &genomes[*b], comparison));
        continuing.truncate(self.population_size.get());

        let target = self.population_size.get() - continuing.len();
        let weights: Vec<f32> = eligible.iter().map(|&g| groups[g].adjusted_rank).collect();
        let allotted = allot(&weights, target);
        debug!("offspring allotment {:?}", allotted);

        let pools: Vec<&[usize]> = groups
            .iter()
            .map(|g| {
                let survivors =
                    (g.members.len() as f32 * self.config.survival_rate).ceil() as usize;
                &g.members[..survivors.clamp(1, g.members.len())]
            })
            .collect();

        let mut parents = Vec::with_capacity(target);
        for (&g, &count) in eligible.iter().zip(&allotted) {
            for _ in 0..count {
                let first = roulette(rng, pools[g]);
                if rng.gen_bool(self.config.mutate_only_probability) {
                    parents.push(vec![first]);
                    continue;
                }
                let mate_group = if groups.len() > 1
                    && rng.gen_bool(self.config.interspecies_mate_probability)
                {
                    let other = rng.below(groups.len() - 1);
                    if other >= g {
                        other + 1
                    } else {
                        other
                    }
                } else {
                    g
                };
                parents.push(vec![first, roulette(rng, pools[mate_group])]);
            }
        }

        Ok(Selection {
            continuing,
            groups: parents,
        })
    }

    fn set_mutate_only(&mut self, engaged: bool) -> bool {
        if engaged {
            if self.saved_mutate_only.is_none() {
                self.saved_mutate_only = Some(self.config.mutate_only_probability);
                self.config.mutate_only_probability = 1.0;
            }
        } else if let Some(saved) = self.saved_mutate_only.take() {
            self.config.mutate_only_probability = saved;
        }
        true
    }
}

/// Ranks genomes `n` (best) down to `1`, ordering them best
/// first by score, then lower complexity, then lower id.
/// Genomes with equal scores share the higher rank.
///
/// # Examples
/// ```
/// use evoneat::{Comparison, Genome};
/// use evoneat::populations::rank;
/// use evoneat::substrate::Substrate;
///
/// let mut genomes: Vec<Genome> = (1..=4)
///     .map(|id| Genome::new(id, Substrate::new(), vec![]))
///     .collect();
/// for (genome, fitness) in genomes.iter_mut().zip([1.0, 3.0, 1.0, 2.0]) {
///     genome.fitness = fitness;
/// }
/// assert_eq!(rank(&genomes, Comparison::Fitness), vec![2, 4, 2, 3]);
/// ```
pub fn rank(genomes: &[Genome], comparison: Comparison) -> Vec<usize> {
    let n = genomes.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|a, b| better(&genomes[*a], &genomes[*b], comparison));

    let mut ranks = vec![0; n];
    let mut current = n;
    for (position, &i) in order.iter().enumerate() {
        if position > 0 {
            let previous = comparison.value(&genomes[order[position - 1]]);
            if previous != comparison.value(&genomes[i]) {
                current = n - position;
            }
        }
        ranks[i] = current;
    }
    ranks
}

/// Picks a member of `pool` (best first) with chance
/// proportional to its rank within the pool.
fn roulette(rng: &mut RandomSource, pool: &[usize]) -> usize {
    let n = pool.len();
    if n <= 1 {
        return pool.first().copied().unwrap_or_default();
    }
    let mut ticket = rng.below(n * (n + 1) / 2);
    for (position, &member) in pool.iter().enumerate() {
        let weight = n - position;
        if ticket < weight {
            return member;
        }
        ticket -= weight;
    }
    pool[0]
}

/// Splits `target` offspring among species in proportion to
/// `weights`, giving every species at least one when there
/// are enough offspring to go around.
fn allot(weights: &[f32], target: usize) -> Vec<usize> {
    let total: f32 = weights.iter().sum();
    if weights.is_empty() || total <= 0.0 {
        return vec![0; weights.len()];
    }
    let shares: Vec<f32> = weights
        .iter()
        .map(|w| w / total * target as f32)
        .collect();
    let mut allotted = round_retain_sum(&shares);
    let floor = if target >= weights.len() { 1 } else { 0 };
    for count in &mut allotted {
        *count = (*count).max(floor);
    }

    let mut by_weight: Vec<usize> = (0..weights.len()).collect();
    by_weight.sort_by(|a, b| weights[*b].total_cmp(&weights[*a]));
    let mut sum: usize = allotted.iter().sum();
    while sum > target {
        let largest = by_weight
            .iter()
            .copied()
            .filter(|&i| allotted[i] > floor)
            .max_by_key(|&i| allotted[i]);
        match largest {
            Some(i) => allotted[i] -= 1,
            None => break,
        }
        sum -= 1;
    }
    let mut next = by_weight.iter().cycle();
    while sum < target {
        if let Some(&i) = next.next() {
            allotted[i] += 1;
        }
        sum += 1;
    }
    allotted
}

/// Rounds each value so that the rounded values add up to the
/// rounded sum of the originals, favouring the values with the
/// largest fractional parts.
fn round_retain_sum(values: &[f32]) -> Vec<usize> {
    let total_sum = values.iter().sum::<f32>().round() as usize;
    let mut truncated: Vec<(usize, usize, f32)> = values
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let u = f.floor();
            let e = f - u;
            (i, u as usize, e)
        })
        .collect();
    let truncated_sum: usize = truncated.iter().map(|(_, u, _)| *u).sum();
    let remainder = total_sum.saturating_sub(truncated_sum).min(truncated.len());
    // Sort in decreasing order of error
    truncated.sort_by(|a, b| b.2.total_cmp(&a.2));
    for (_, u, _) in &mut truncated[..remainder] {
        *u += 1;
    }
    truncated.sort_by_key(|(i, ..)| *i);
    truncated.iter().map(|(_, u, _)| *u).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::populations::Species;
    use crate::substrate::{Node, Position, Substrate};

    fn genome(id: u64, species: SpeciesId, fitness: f32) -> Genome {
        let nodes = vec![Node::input(Position::planar(0.0, id as f32))];
        let mut genome = Genome::new(id, Substrate::from_parts(nodes, vec![]).unwrap(), vec![]);
        genome.species_id = Some(species);
        genome.fitness = fitness;
        genome
    }

    fn population() -> Population {
        let genomes = vec![
            genome(1, 1, 1.0),
            genome(2, 1, 4.0),
            genome(3, 1, 2.0),
            genome(4, 2, 3.0),
            genome(5, 2, 0.5),
            genome(6, 2, 0.0),
        ];
        let species = vec![
            Species::new(1, genomes[0].clone()),
            Species::new(2, genomes[3].clone()),
        ];
        Population {
            generation: 1,
            genomes,
            species,
        }
    }

    fn selector(config: SelectorConfig) -> RankSelector {
        RankSelector::new(config, NonZeroUsize::new(6).unwrap()).unwrap()
    }

    #[test]
    fn round_retain_sum() {
        let v = [5.2, 9.5, 2.8, 1.3, 2.2, 2.7, 6.3, 1.0000001, 0.9999999];
        let w = super::round_retain_sum(&v);
        assert_eq!(w.iter().sum::<usize>(), 32);
        assert_eq!(w, [5, 10, 3, 1, 2, 3, 6, 1, 1]);
    }

    #[test]
    fn allot_gives_every_species_one() {
        assert_eq!(allot(&[10.0, 0.1, 0.1], 5), vec![3, 1, 1]);
        assert_eq!(allot(&[1.0, 1.0], 4), vec![2, 2]);
        assert_eq!(allot(&[3.0, 1.0, 1.0], 2).iter().sum::<usize>(), 2);
        assert_eq!(allot(&[], 5), Vec::<usize>::new());
    }

    #[test]
    fn rank_is_stable() {
        let population = population();
        let first = rank(&population.genomes, Comparison::Fitness);
        let second = rank(&population.genomes, Comparison::Fitness);
        assert_eq!(first, second);
        assert_eq!(first, vec![3, 6, 4, 5, 2, 1]);
    }

    #[test]
    fn conserves_population_size() {
        let selector = selector(SelectorConfig {
            elitism: 1,
            survival_rate: 0.5,
            mutate_only_probability: 0.3,
            interspecies_mate_probability: 0.2,
            ..SelectorConfig::zero()
        });
        let mut rng = RandomSource::seeded(12);
        let mut population = population();
        let selection = selector.select(&mut rng, &mut population).unwrap();
        assert_eq!(selection.continuing, vec![1, 3]);
        assert_eq!(selection.continuing.len() + selection.groups.len(), 6);
        assert!(selection
            .groups
            .iter()
            .all(|g| (1..=2).contains(&g.len()) && g.iter().all(|&i| i < 6)));
    }

    #[test]
    fn stagnant_species_get_no_offspring() {
        let selector = selector(SelectorConfig {
            elitism: 1,
            survival_rate: 1.0,
            ..SelectorConfig::zero()
        });
        let mut population = population();
        population.species[0].decay = 1.0;
        let selection = selector
            .select(&mut RandomSource::seeded(5), &mut population)
            .unwrap();
        // The overall best (genome 2) lives in the stagnant
        // species, yet continues.
        assert_eq!(selection.continuing, vec![1, 3]);
        assert_eq!(selection.groups.len(), 4);
        assert!(selection
            .groups
            .iter()
            .flatten()
            .all(|&i| population.genomes[i].species_id == Some(2)));
    }

    #[test]
    fn all_stagnant_restarts_from_best() {
        let selector = selector(SelectorConfig::zero());
        let mut population = population();
        for species in &mut population.species {
            species.decay = 1.0;
            species.champion = Some(1);
        }
        let selection = selector
            .select(&mut RandomSource::seeded(5), &mut population)
            .unwrap();
        assert_eq!(selection.continuing, vec![1]);
        assert_eq!(selection.groups, vec![vec![1]; 5]);
        assert!(population
            .species
            .iter()
            .all(|s| s.decay() == 0.0 && s.champion().is_none()));
    }

    #[test]
    fn mutate_only_toggle_restores_probability() {
        let mut selector = selector(SelectorConfig {
            mutate_only_probability: 0.25,
            ..SelectorConfig::zero()
        });
        assert!(selector.set_mutate_only(true));
        assert_eq!(selector.config().mutate_only_probability, 1.0);
        let selection = selector
            .select(&mut RandomSource::seeded(1), &mut population())
            .unwrap();
        assert!(selection.groups.iter().all(|g| g.len() == 1));
        selector.set_mutate_only(false);
        assert_eq!(selector.config().mutate_only_probability, 0.25);
    }

    #[test]
    fn roulette_favours_the_best() {
        let mut rng = RandomSource::seeded(0);
        let pool = [7, 8, 9];
        let mut counts = [0; 3];
        for _ in 0..6000 {
            counts[roulette(&mut rng, &pool) - 7] += 1;
        }
        assert!(counts[0] > counts[1] && counts[1] > counts[2]);
    }
}
