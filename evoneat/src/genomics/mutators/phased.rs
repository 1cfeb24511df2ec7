use super::{Mutator, Mutators};
use crate::errors::Error;
use crate::genome::Genome;
use crate::genomics::PhasedConfig;
use crate::populations::{Population, Selector};
use crate::rng::RandomSource;

use log::debug;

/// The pipeline a [`Phased`] mutator currently delegates to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Complexifying,
    Simplifying,
}

/// Alternates between a complexifying and a simplifying
/// pipeline, driven by the population's mean complexity.
///
/// A complexifying phase lasts until mean complexity has
/// grown by `phase_threshold` and at least `hold_phase`
/// generations have passed. A simplifying phase lasts until
/// mean complexity has failed to reach a new minimum for
/// more than `hold_phase` generations. While simplifying,
/// the selector is asked to produce mutation-only offspring.
pub struct Phased {
    config: PhasedConfig,
    complexify: Mutators,
    simplify: Mutators,
    phase: Phase,
    threshold: Option<f32>,
    min_complexity: f32,
    held: usize,
}

impl Phased {
    pub fn new(
        config: PhasedConfig,
        complexify: Mutators,
        simplify: Mutators,
    ) -> Result<Phased, Error> {
        config.validate()?;
        Ok(Phased {
            config,
            complexify,
            simplify,
            phase: Phase::Complexifying,
            threshold: None,
            min_complexity: f32::INFINITY,
            held: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advances the phase state machine by one generation.
    fn observe(&mut self, mean_complexity: f32, selector: &mut dyn Selector) {
        let threshold = match self.threshold {
            Some(threshold) => threshold,
            None => {
                let threshold = mean_complexity + self.config.phase_threshold;
                self.threshold = Some(threshold);
                threshold
            }
        };
        match self.phase {
            Phase::Complexifying => {
                self.held += 1;
                if mean_complexity >= threshold && self.held > self.config.hold_phase {
                    debug!("simplifying at mean complexity {:.2}", mean_complexity);
                    self.phase = Phase::Simplifying;
                    self.min_complexity = mean_complexity;
                    self.held = 0;
                    selector.set_mutate_only(true);
                }
            }
            Phase::Simplifying => {
                if mean_complexity < self.min_complexity {
                    self.min_complexity = mean_complexity;
                    self.held = 0;
                } else {
                    self.held += 1;
                }
                if self.held > self.config.hold_phase {
                    debug!("complexifying from mean complexity {:.2}", self.min_complexity);
                    self.phase = Phase::Complexifying;
                    self.threshold = Some(self.min_complexity + self.config.phase_threshold);
                    self.held = 0;
                    selector.set_mutate_only(false);
                }
            }
        }
    }
}

impl Mutator for Phased {
    fn mutate(&self, rng: &mut RandomSource, genome: &mut Genome) -> Result<bool, Error> {
        match self.phase {
            Phase::Complexifying => self.complexify.mutate(rng, genome),
            Phase::Simplifying => self.simplify.mutate(rng, genome),
        }
    }

    fn prepare(&mut self, population: &Population, selector: &mut dyn Selector) {
        self.observe(population.mean_complexity(), selector);
        self.complexify.prepare(population, selector);
        self.simplify.prepare(population, selector);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::populations::{Population, Selection};

    #[derive(Default)]
    struct Toggle {
        engaged: bool,
    }

    impl Selector for Toggle {
        fn select(&self, _: &mut RandomSource, _: &mut Population) -> Result<Selection, Error> {
            Ok(Selection::default())
        }

        fn set_mutate_only(&mut self, engaged: bool) -> bool {
            self.engaged = engaged;
            true
        }
    }

    fn phased(threshold: f32, hold: usize) -> Phased {
        Phased::new(
            PhasedConfig {
                phase_threshold: threshold,
                hold_phase: hold,
            },
            Mutators::new(),
            Mutators::new(),
        )
        .unwrap()
    }

    #[test]
    fn switches_after_growth_and_hold() {
        let mut phased = phased(5.0, 1);
        let mut selector = Toggle::default();

        phased.observe(10.0, &mut selector);
        assert_eq!(phased.phase(), Phase::Complexifying);
        phased.observe(15.0, &mut selector);
        assert_eq!(phased.phase(), Phase::Simplifying);
        assert!(selector.engaged);

        // Falling complexity keeps the simplifying phase going.
        phased.observe(12.0, &mut selector);
        phased.observe(11.0, &mut selector);
        assert_eq!(phased.phase(), Phase::Simplifying);
        phased.observe(11.0, &mut selector);
        assert_eq!(phased.phase(), Phase::Simplifying);
        phased.observe(11.5, &mut selector);
        assert_eq!(phased.phase(), Phase::Complexifying);
        assert!(!selector.engaged);
        assert_eq!(phased.threshold, Some(16.0));
    }

    #[test]
    fn growth_alone_does_not_switch_before_hold() {
        let mut phased = phased(1.0, 3);
        let mut selector = Toggle::default();
        phased.observe(10.0, &mut selector);
        phased.observe(20.0, &mut selector);
        phased.observe(30.0, &mut selector);
        assert_eq!(phased.phase(), Phase::Complexifying);
        phased.observe(40.0, &mut selector);
        assert_eq!(phased.phase(), Phase::Simplifying);
    }
}
