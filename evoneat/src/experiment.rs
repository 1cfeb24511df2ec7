//! The generational loop: selection, variation, speciation,
//! decoding, evaluation and update, with events published to
//! subscribers along the way.
mod config;
mod events;

pub use config::ExperimentConfig;
pub use events::{Cancellation, Event, IterationLimit, SolutionFound, Subscriber, Subscribers};

use crate::errors::{Error, GenerationError, GenomeFailure, Stage};
use crate::genome::{Genome, GenomeId, SpeciesId};
use crate::genomics::{
    ActivationMutator, BiasMutator, Complexify, Crosser, Mutator, Mutators, Phased, Pruning,
    Seeder, Simplify, TraitMutator, WeightMutator,
};
use crate::networks::{Phenome, Translator};
use crate::populations::{Population, Populator, RankSelector, Selector, Speciator, Updater};
use crate::rng::RandomSource;
use crate::search::Searcher;
use crate::substrate::Substrate;
use crate::transcription::Transcriber;

use log::{info, warn};

/// A running neuroevolution experiment.
///
/// The experiment owns every stage of a generation. The
/// representation-dependent stages (decoding, network
/// building and evaluation) are supplied by the caller.
pub struct Experiment<T, R, S> {
    populator: Populator,
    crosser: Crosser,
    mutators: Mutators,
    speciator: Speciator,
    selector: Box<dyn Selector>,
    updater: Updater,
    transcriber: T,
    translator: R,
    searcher: S,
    subscribers: Subscribers,
    rng: RandomSource,
    next_genome_id: GenomeId,
    next_species_id: SpeciesId,
}

impl<T, R, S> Experiment<T, R, S>
where
    T: Transcriber,
    R: Translator,
    S: Searcher<R::Network>,
{
    /// Builds an experiment with the rank selector and the
    /// mutation pipeline described by `config`.
    ///
    /// The pipeline is complexify, then simplify (if
    /// configured), then weight, bias, trait and activation
    /// (if configured) mutation. A phased configuration wraps
    /// the growing and shrinking parts in a [`Phased`] mutator.
    ///
    /// # Errors
    /// Returns an error if any part of `config` is invalid.
    pub fn new(
        config: &ExperimentConfig,
        transcriber: T,
        translator: R,
        searcher: S,
    ) -> Result<Experiment<T, R, S>, Error> {
        config.validate()?;
        let parametric = || -> Result<Mutators, Error> {
            let mut mutators = Mutators::new()
                .with(WeightMutator::new(config.weight.clone())?)
                .with(BiasMutator::new(config.bias.clone())?)
                .with(TraitMutator::new(config.traits.clone())?);
            if let Some(activation) = &config.activation {
                mutators.push(ActivationMutator::new(activation.clone())?);
            }
            Ok(mutators)
        };

        let mut mutators = Mutators::new();
        match (&config.phased, &config.simplify) {
            (Some(phased), Some(simplify)) => {
                let growing = Mutators::new().with(Complexify::new(config.complexify.clone())?);
                let shrinking = Mutators::new()
                    .with(Simplify::new(simplify.clone())?)
                    .with(Pruning);
                mutators.push(Phased::new(phased.clone(), growing, shrinking)?);
            }
            (_, simplify) => {
                mutators.push(Complexify::new(config.complexify.clone())?);
                if let Some(simplify) = simplify {
                    mutators.push(Simplify::new(simplify.clone())?);
                }
            }
        }
        mutators.push(parametric()?);

        let rng = match config.seed {
            Some(seed) => RandomSource::seeded(seed),
            None => RandomSource::from_entropy(),
        };
        Ok(Experiment {
            populator: Populator::new(config.populator.clone()),
            crosser: Crosser::new(config.crosser.clone())?,
            mutators,
            speciator: Speciator::new(config.speciator.clone(), config.distancer.clone())?,
            selector: Box::new(RankSelector::new(
                config.selector.clone(),
                config.populator.population_size,
            )?),
            updater: Updater::new(config.selector.species_decay_rate),
            transcriber,
            translator,
            searcher,
            subscribers: Subscribers::new(),
            rng,
            next_genome_id: 0,
            next_species_id: 0,
        })
    }

    /// Replaces the mutation pipeline.
    pub fn with_mutators(mut self, mutators: Mutators) -> Self {
        self.mutators = mutators;
        self
    }

    /// Replaces the selector.
    pub fn with_selector(mut self, selector: impl Selector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// Registers a subscriber for every event of the run.
    pub fn subscribe(&mut self, subscriber: impl Subscriber + 'static) {
        self.subscribers.push(subscriber);
    }

    pub fn speciator(&self) -> &Speciator {
        &self.speciator
    }

    /// Seeds the initial population.
    pub fn populate(&mut self, seeder: &dyn Seeder) -> Result<Population, Error> {
        let mut rng = self.rng.fork();
        self.populator.populate(seeder, &mut rng)
    }

    /// Evolves `population` until `cancellation` is triggered,
    /// returning the last fully evaluated population.
    ///
    /// The initial population is speciated and evaluated
    /// before the first generation is bred. Id counters start
    /// after the highest ids found in it.
    ///
    /// # Errors
    /// Fails on searcher errors and on generations in which
    /// no genome could be decoded.
    pub fn run(
        &mut self,
        mut population: Population,
        cancellation: &Cancellation,
    ) -> Result<Population, Error> {
        self.next_genome_id = self.next_genome_id.max(population.max_genome_id());
        self.next_species_id = self.next_species_id.max(population.max_species_id());

        self.subscribers
            .publish(Event::Started, &population, cancellation);
        self.speciator
            .speciate(&mut population, &mut self.next_species_id)?;
        let mut failures = vec![];
        match self.evaluate(&mut population, &mut failures, cancellation) {
            Ok(()) => {}
            Err(Error::Cancelled) => return Ok(self.complete(population, cancellation)),
            Err(e) => return Err(e),
        }
        report(population.generation, failures);

        while !cancellation.is_cancelled() {
            match self.advance(&population, cancellation) {
                Ok(next) => population = next,
                Err(Error::Cancelled) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(self.complete(population, cancellation))
    }

    /// Breeds, decodes and evaluates the generation that
    /// follows `population`.
    ///
    /// # Errors
    /// Returns [`Error::Cancelled`] if cancellation is
    /// requested between two stages.
    pub fn advance(
        &mut self,
        population: &Population,
        cancellation: &Cancellation,
    ) -> Result<Population, Error> {
        let mut current = population.clone();
        self.mutators.prepare(&current, self.selector.as_mut());
        let selection = self.selector.select(&mut self.rng.fork(), &mut current)?;
        cancellation.checkpoint()?;

        let mut failures = vec![];
        let mut genomes: Vec<Genome> = selection
            .continuing
            .iter()
            .map(|&i| current.genomes[i].clone())
            .collect();
        for group in &selection.groups {
            self.next_genome_id += 1;
            let id = self.next_genome_id;
            let parents: Vec<&Genome> = group.iter().map(|&i| &current.genomes[i]).collect();
            match self.breed(&parents) {
                Ok(mut child) => {
                    child.id = id;
                    genomes.push(child);
                }
                Err(e) => failures.push(GenomeFailure::new(id, Stage::Variation, e)),
            }
        }
        cancellation.checkpoint()?;

        let mut next = Population {
            generation: current.generation + 1,
            genomes,
            species: current.species,
        };
        self.speciator
            .speciate(&mut next, &mut self.next_species_id)?;
        cancellation.checkpoint()?;

        self.evaluate(&mut next, &mut failures, cancellation)?;
        report(next.generation, failures);
        if let Some(champion) = next.champion() {
            info!(
                "generation {}: {} species, champion {} with fitness {:.4}, mean complexity {:.2}",
                next.generation,
                next.species.len(),
                champion.id,
                champion.fitness,
                next.mean_complexity()
            );
        }
        self.subscribers
            .publish(Event::Advanced, &next, cancellation);
        Ok(next)
    }

    fn breed(&mut self, parents: &[&Genome]) -> Result<Genome, Error> {
        let mut rng = self.rng.fork();
        let mut child = self.crosser.cross(&mut rng, parents)?;
        self.mutators.mutate(&mut rng, &mut child)?;
        Ok(child)
    }

    /// Decodes, translates and evaluates every genome, then
    /// updates species records.
    fn evaluate(
        &mut self,
        population: &mut Population,
        failures: &mut Vec<GenomeFailure>,
        cancellation: &Cancellation,
    ) -> Result<(), Error> {
        for genome in &mut population.genomes {
            genome.decoded = match self.transcriber.transcribe(&genome.encoded) {
                Ok(decoded) => decoded,
                Err(e) => {
                    warn!("genome {} could not be transcribed: {}", genome.id, e);
                    failures.push(GenomeFailure::new(genome.id, Stage::Transcription, e));
                    Substrate::new()
                }
            };
        }
        self.subscribers
            .publish(Event::Decoded, population, cancellation);
        cancellation.checkpoint()?;

        let mut phenomes = Vec::with_capacity(population.genomes.len());
        for genome in population.genomes.iter().filter(|g| !g.decoded.is_empty()) {
            match self.translator.translate(&genome.decoded) {
                Ok(network) => phenomes.push(Phenome {
                    id: genome.id,
                    traits: genome.traits.clone(),
                    network,
                }),
                Err(e) => {
                    warn!("genome {} could not be translated: {}", genome.id, e);
                    failures.push(GenomeFailure::new(genome.id, Stage::Translation, e));
                }
            }
        }
        if phenomes.is_empty() && !population.genomes.is_empty() {
            return Err(GenerationError {
                generation: population.generation,
                failures: std::mem::take(failures),
            }
            .into());
        }
        cancellation.checkpoint()?;

        let evaluations = self.searcher.search(&phenomes)?;
        self.updater.update(population, &evaluations);
        self.subscribers
            .publish(Event::Evaluated, population, cancellation);
        Ok(())
    }

    fn complete(&self, population: Population, cancellation: &Cancellation) -> Population {
        self.subscribers
            .publish(Event::Completed, &population, cancellation);
        population
    }
}

fn report(generation: usize, failures: Vec<GenomeFailure>) {
    if !failures.is_empty() {
        warn!("{}", GenerationError { generation, failures });
    }
}
