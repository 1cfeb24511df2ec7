use crate::errors::ConfigError;
use crate::genome::Comparison;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration of the initial population.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulatorConfig {
    /// Number of genomes per generation.
    pub population_size: NonZeroUsize,
}

impl PopulatorConfig {
    /// Returns a "zero-valued" default configuration,
    /// with a population of one.
    ///
    /// # Examples
    /// ```
    /// use evoneat::populations::PopulatorConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = PopulatorConfig {
    ///     population_size: NonZeroUsize::new(150).unwrap(),
    /// };
    /// assert_ne!(config, PopulatorConfig::zero());
    /// ```
    pub const fn zero() -> PopulatorConfig {
        PopulatorConfig {
            population_size: NonZeroUsize::MIN,
        }
    }
}

/// Configuration of reproduction.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Chance that an offspring has a single parent.
    pub mutate_only_probability: f32,
    /// Chance that the second parent is drawn
    /// from a different species.
    pub interspecies_mate_probability: f32,
    /// Top n of each non-stagnant species which is
    /// copied as-is to the next generation.
    pub elitism: usize,
    /// Top fraction of each species which can
    /// participate in mating. At least one member
    /// always can.
    pub survival_rate: f32,
    pub comparison: Comparison,
    /// Decay accumulated by a species for each
    /// generation without improvement.
    pub species_decay_rate: f32,
}

impl SelectorConfig {
    pub const fn zero() -> SelectorConfig {
        SelectorConfig {
            mutate_only_probability: 0.0,
            interspecies_mate_probability: 0.0,
            elitism: 0,
            survival_rate: 0.0,
            comparison: Comparison::Fitness,
            species_decay_rate: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_probability("mutate-only-probability", self.mutate_only_probability)?;
        ConfigError::check_probability(
            "interspecies-mate-probability",
            self.interspecies_mate_probability,
        )?;
        ConfigError::check_probability("survival-rate", self.survival_rate)?;
        ConfigError::check_non_negative("species-decay-rate", self.species_decay_rate)
    }
}

/// Configuration of speciation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciatorConfig {
    /// Initial compatibility distance under which a
    /// genome joins an existing species.
    pub compatibility_threshold: f32,
    /// Step by which the threshold adapts.
    pub compatibility_modifier: f32,
    /// Desired number of species receiving new genomes
    /// each generation. Zero disables threshold adaptation.
    pub target_species: usize,
}

impl SpeciatorConfig {
    pub const fn zero() -> SpeciatorConfig {
        SpeciatorConfig {
            compatibility_threshold: 0.0,
            compatibility_modifier: 0.0,
            target_species: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compatibility_threshold < 0.0 {
            return Err(ConfigError::NegativeThreshold(self.compatibility_threshold));
        }
        ConfigError::check_non_negative("compatibility-modifier", self.compatibility_modifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_threshold() {
        let config = SpeciatorConfig {
            compatibility_threshold: -1.0,
            ..SpeciatorConfig::zero()
        };
        assert_eq!(config.validate(), Err(ConfigError::NegativeThreshold(-1.0)));
    }

    #[test]
    fn selector_probabilities() {
        assert!(SelectorConfig::zero().validate().is_ok());
        let config = SelectorConfig {
            survival_rate: 1.2,
            ..SelectorConfig::zero()
        };
        assert!(config.validate().is_err());
    }
}
