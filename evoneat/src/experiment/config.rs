use crate::errors::{ConfigError, Error};
use crate::genomics::{
    ActivationConfig, BiasConfig, ComplexifyConfig, CrosserConfig, DistancerConfig, PhasedConfig,
    SeederConfig, SimplifyConfig, TraitConfig, WeightConfig,
};
use crate::populations::{PopulatorConfig, SelectorConfig, SpeciatorConfig};

use serde::{Deserialize, Serialize};

/// Every option of an experiment.
///
/// Optional sections switch the matching operators on:
/// `activation` adds hidden-node activation mutation,
/// `simplify` adds structural shrinking, and `phased`
/// alternates between growing and shrinking (it requires
/// `simplify`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Seed of the experiment's random source. Unseeded
    /// experiments draw one from the operating system.
    #[serde(default)]
    pub seed: Option<u64>,
    pub seeder: SeederConfig,
    pub populator: PopulatorConfig,
    pub crosser: CrosserConfig,
    pub selector: SelectorConfig,
    pub speciator: SpeciatorConfig,
    pub distancer: DistancerConfig,
    pub complexify: ComplexifyConfig,
    pub weight: WeightConfig,
    pub bias: BiasConfig,
    #[serde(rename = "trait")]
    pub traits: TraitConfig,
    #[serde(default)]
    pub activation: Option<ActivationConfig>,
    #[serde(default)]
    pub simplify: Option<SimplifyConfig>,
    #[serde(default)]
    pub phased: Option<PhasedConfig>,
}

impl ExperimentConfig {
    /// Returns a "zero-valued" default configuration.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    pub const fn zero() -> ExperimentConfig {
        ExperimentConfig {
            seed: None,
            seeder: SeederConfig::zero(),
            populator: PopulatorConfig::zero(),
            crosser: CrosserConfig::zero(),
            selector: SelectorConfig::zero(),
            speciator: SpeciatorConfig::zero(),
            distancer: DistancerConfig::zero(),
            complexify: ComplexifyConfig::zero(),
            weight: WeightConfig::zero(),
            bias: BiasConfig::zero(),
            traits: TraitConfig::zero(),
            activation: None,
            simplify: None,
            phased: None,
        }
    }

    /// Parses and validates a configuration written in RON.
    ///
    /// # Examples
    /// ```
    /// use evoneat::experiment::ExperimentConfig;
    ///
    /// let mut config = ExperimentConfig::zero();
    /// config.seed = Some(7);
    /// let text = ron::to_string(&config).unwrap();
    ///
    /// assert_eq!(ExperimentConfig::from_ron(&text).unwrap(), config);
    /// assert!(ExperimentConfig::from_ron("(seed: Some(").is_err());
    /// ```
    pub fn from_ron(text: &str) -> Result<ExperimentConfig, Error> {
        let config: ExperimentConfig =
            ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.seeder.validate()?;
        self.crosser.validate()?;
        self.selector.validate()?;
        self.speciator.validate()?;
        self.distancer.validate()?;
        self.complexify.validate()?;
        self.weight.validate()?;
        self.bias.validate()?;
        self.traits.validate()?;
        if let Some(activation) = &self.activation {
            activation.validate()?;
        }
        if let Some(simplify) = &self.simplify {
            simplify.validate()?;
        }
        match (&self.phased, &self.simplify) {
            (Some(_), None) => Err(ConfigError::Parse(
                "a phased configuration needs a simplify section".into(),
            )),
            (Some(phased), Some(_)) => phased.validate(),
            (None, _) => Ok(()),
        }
    }
}
