use super::Population;
use crate::experiment::{Cancellation, Event, Subscriber};
use crate::genome::{Genome, SpeciesId};

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllGenomes,
    /// Clones species champions.
    SpeciesChampions,
    /// Clones only the population champion.
    PopulationChampion,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of a population.
#[derive(Clone, Debug)]
pub struct Log {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord,
    pub species_count: usize,
    pub genome_stats: Vec<(String, Stats)>,
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Log {{")?;
        writeln!(f, "\tgeneration_number: {}", self.generation_number)?;
        writeln!(f, "\tspecies_count: {}", self.species_count)?;
        for (name, stats) in &self.genome_stats {
            writeln!(f, "\t{}: {:?}", name, stats)?;
        }
        write!(f, "}}")
    }
}

/// Basic statistics over a sequence of numbers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence.
    /// An empty sequence yields all zeros.
    ///
    /// # Examples
    /// ```
    /// use evoneat::populations::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Stats {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return Stats::default();
        }
        data.sort_unstable_by(f32::total_cmp);
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f32>() / data.len() as f32,
            median,
        }
    }
}

/// A reporting-level dependant store
/// of genomes from a population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord {
    /// Species IDs, their members and decay.
    Species(Vec<(SpeciesId, Vec<Genome>, f32)>),
    /// Species IDs, species champions and decay.
    SpeciesChampions(Vec<(SpeciesId, Genome, f32)>),
    /// Only the population champion.
    PopulationChampion(Genome),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
///
/// Clones share the same log store, so a clone can be
/// subscribed to an experiment while the original is kept
/// to read the logs afterwards. Every evaluated generation
/// is logged.
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    logs: Arc<Mutex<Vec<Log>>>,
}

impl EvolutionLogger {
    /// Returns a logger with the appropiate reporting level.
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            logs: Arc::default(),
        }
    }

    /// Store a snapshot of a population, with statistics on
    /// the fitness, novelty and complexity of its genomes.
    ///
    /// # Examples
    /// ```
    /// use evoneat::Genome;
    /// use evoneat::populations::Population;
    /// use evoneat::populations::logging::{EvolutionLogger, ReportingLevel};
    /// use evoneat::substrate::Substrate;
    ///
    /// let logger = EvolutionLogger::new(ReportingLevel::PopulationChampion);
    /// let mut genome = Genome::new(1, Substrate::new(), vec![]);
    /// genome.fitness = 3.0;
    /// logger.log(&Population::new(vec![genome]));
    ///
    /// let logs = logger.logs();
    /// assert_eq!(logs.len(), 1);
    /// assert_eq!(logs[0].genome_stats[0].1.maximum, 3.0);
    /// ```
    pub fn log(&self, population: &Population) {
        let extract: [(&str, fn(&Genome) -> f32); 3] = [
            ("fitness", |g| g.fitness),
            ("novelty", |g| g.novelty),
            ("complexity", |g| g.complexity() as f32),
        ];
        let genome_stats = extract
            .iter()
            .map(|(name, f)| {
                (
                    name.to_string(),
                    Stats::from(population.genomes.iter().map(f)),
                )
            })
            .collect();
        let generation_sample = match self.reporting_level {
            ReportingLevel::AllGenomes => GenerationMemberRecord::Species(
                population
                    .species
                    .iter()
                    .map(|s| {
                        let members = population.members(s.id()).cloned().collect();
                        (s.id(), members, s.decay())
                    })
                    .collect(),
            ),
            ReportingLevel::SpeciesChampions => GenerationMemberRecord::SpeciesChampions(
                population
                    .species
                    .iter()
                    .filter_map(|s| {
                        let champion = s.champion().and_then(|id| population.genome(id))?;
                        Some((s.id(), champion.clone(), s.decay()))
                    })
                    .collect(),
            ),
            ReportingLevel::PopulationChampion => match population.champion() {
                Some(champion) => GenerationMemberRecord::PopulationChampion(champion.clone()),
                None => GenerationMemberRecord::None,
            },
            ReportingLevel::NoGenomes => GenerationMemberRecord::None,
        };
        self.store().push(Log {
            generation_number: population.generation,
            generation_sample,
            species_count: population.species.len(),
            genome_stats,
        });
    }

    /// A copy of all logged snapshots, oldest first.
    pub fn logs(&self) -> Vec<Log> {
        self.store().clone()
    }

    fn store(&self) -> MutexGuard<'_, Vec<Log>> {
        self.logs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Subscriber for EvolutionLogger {
    fn notify(&self, event: Event, population: &Population, _: &Cancellation) {
        if event == Event::Evaluated {
            self.log(population);
        }
    }
}
