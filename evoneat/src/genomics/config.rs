use crate::errors::ConfigError;
use crate::genome::Comparison;
use crate::substrate::Activation;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Shape of the initial genome.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]; [`validate`]
/// reports those that are not.
///
/// [`validate`]: SeederConfig::validate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeederConfig {
    pub num_inputs: NonZeroUsize,
    pub num_outputs: NonZeroUsize,
    /// Length of every genome's trait vector.
    pub num_traits: usize,
    pub output_activation: Activation,
    /// Chance that a given input-output connection
    /// is left out of the seed.
    pub disconnect_rate: f32,
    pub bias_power: f32,
    pub max_bias: f32,
    pub weight_power: f32,
    pub max_weight: f32,
}

impl SeederConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, empty, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use evoneat::genomics::SeederConfig;
    /// use std::num::NonZeroUsize;
    ///
    /// let config = SeederConfig {
    ///     num_inputs: NonZeroUsize::new(2).unwrap(),
    ///     weight_power: 1.0,
    ///     max_weight: 5.0,
    ///     ..SeederConfig::zero()
    /// };
    /// assert!(config.validate().is_ok());
    /// ```
    pub const fn zero() -> SeederConfig {
        SeederConfig {
            num_inputs: NonZeroUsize::MIN,
            num_outputs: NonZeroUsize::MIN,
            num_traits: 0,
            output_activation: Activation::Sigmoid,
            disconnect_rate: 0.0,
            bias_power: 0.0,
            max_bias: 0.0,
            weight_power: 0.0,
            max_weight: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_probability("disconnect-rate", self.disconnect_rate)?;
        ConfigError::check_power("bias-power", self.bias_power)?;
        ConfigError::check_non_negative("max-bias", self.max_bias)?;
        ConfigError::check_power("weight-power", self.weight_power)?;
        ConfigError::check_non_negative("max-weight", self.max_weight)
    }
}

/// Crossover behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrosserConfig {
    /// Chance that a connection disabled in the
    /// child is enabled again.
    pub enable_probability: f32,
    /// If set, parents with equal scores are not
    /// treated as equal: the first one passed wins.
    pub disable_equal_parent_check: bool,
    pub comparison: Comparison,
}

impl CrosserConfig {
    pub const fn zero() -> CrosserConfig {
        CrosserConfig {
            enable_probability: 0.0,
            disable_equal_parent_check: false,
            comparison: Comparison::Fitness,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_probability("enable-probability", self.enable_probability)
    }
}

/// Coefficients of the compatibility distance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistancerConfig {
    pub nodes_coefficient: f32,
    pub activation_coefficient: f32,
    pub conns_coefficient: f32,
    pub weight_coefficient: f32,
}

impl DistancerConfig {
    pub const fn zero() -> DistancerConfig {
        DistancerConfig {
            nodes_coefficient: 0.0,
            activation_coefficient: 0.0,
            conns_coefficient: 0.0,
            weight_coefficient: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_non_negative("nodes-coefficient", self.nodes_coefficient)?;
        ConfigError::check_non_negative("activation-coefficient", self.activation_coefficient)?;
        ConfigError::check_non_negative("conns-coefficient", self.conns_coefficient)?;
        ConfigError::check_non_negative("weight-coefficient", self.weight_coefficient)
    }
}

/// Structural growth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplexifyConfig {
    pub add_node_probability: f32,
    pub add_conn_probability: f32,
    /// Deviation of new connections' weights.
    pub weight_power: f32,
    pub max_weight: f32,
    /// Deviation of new nodes' biases.
    pub bias_power: f32,
    pub max_bias: f32,
    pub hidden_activation: Activation,
}

impl ComplexifyConfig {
    pub const fn zero() -> ComplexifyConfig {
        ComplexifyConfig {
            add_node_probability: 0.0,
            add_conn_probability: 0.0,
            weight_power: 0.0,
            max_weight: 0.0,
            bias_power: 0.0,
            max_bias: 0.0,
            hidden_activation: Activation::Sigmoid,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_probability("add-node-probability", self.add_node_probability)?;
        ConfigError::check_probability("add-conn-probability", self.add_conn_probability)?;
        ConfigError::check_power("weight-power", self.weight_power)?;
        ConfigError::check_non_negative("max-weight", self.max_weight)?;
        ConfigError::check_power("bias-power", self.bias_power)?;
        ConfigError::check_non_negative("max-bias", self.max_bias)
    }
}

/// Connection weight mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub mutate_weight_probability: f32,
    /// Chance that a mutated weight is resampled
    /// instead of perturbed.
    pub replace_weight_probability: f32,
    pub weight_power: f32,
    pub max_weight: f32,
}

impl WeightConfig {
    pub const fn zero() -> WeightConfig {
        WeightConfig {
            mutate_weight_probability: 0.0,
            replace_weight_probability: 0.0,
            weight_power: 0.0,
            max_weight: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_probability(
            "mutate-weight-probability",
            self.mutate_weight_probability,
        )?;
        ConfigError::check_probability(
            "replace-weight-probability",
            self.replace_weight_probability,
        )?;
        ConfigError::check_power("weight-power", self.weight_power)?;
        ConfigError::check_non_negative("max-weight", self.max_weight)
    }
}

/// Node bias mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiasConfig {
    pub mutate_bias_probability: f32,
    pub replace_bias_probability: f32,
    pub bias_power: f32,
    pub max_bias: f32,
}

impl BiasConfig {
    pub const fn zero() -> BiasConfig {
        BiasConfig {
            mutate_bias_probability: 0.0,
            replace_bias_probability: 0.0,
            bias_power: 0.0,
            max_bias: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_probability("mutate-bias-probability", self.mutate_bias_probability)?;
        ConfigError::check_probability("replace-bias-probability", self.replace_bias_probability)?;
        ConfigError::check_power("bias-power", self.bias_power)?;
        ConfigError::check_non_negative("max-bias", self.max_bias)
    }
}

/// Trait vector mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitConfig {
    pub mutate_trait_probability: f32,
    pub replace_trait_probability: f32,
}

impl TraitConfig {
    pub const fn zero() -> TraitConfig {
        TraitConfig {
            mutate_trait_probability: 0.0,
            replace_trait_probability: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_probability("mutate-trait-probability", self.mutate_trait_probability)?;
        ConfigError::check_probability("replace-trait-probability", self.replace_trait_probability)
    }
}

/// Hidden-node activation replacement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivationConfig {
    pub replace_activation_probability: f32,
    /// Activations a hidden node may be given.
    pub activations: Vec<Activation>,
}

impl ActivationConfig {
    pub const fn zero() -> ActivationConfig {
        ActivationConfig {
            replace_activation_probability: 0.0,
            activations: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_probability(
            "replace-activation-probability",
            self.replace_activation_probability,
        )
    }
}

/// Structural shrinking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimplifyConfig {
    pub del_conn_probability: f32,
    pub del_node_probability: f32,
}

impl SimplifyConfig {
    pub const fn zero() -> SimplifyConfig {
        SimplifyConfig {
            del_conn_probability: 0.0,
            del_node_probability: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_probability("del-conn-probability", self.del_conn_probability)?;
        ConfigError::check_probability("del-node-probability", self.del_node_probability)
    }
}

/// Alternation between complexifying and simplifying.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhasedConfig {
    /// Mean-complexity growth that ends a
    /// complexifying phase.
    pub phase_threshold: f32,
    /// Minimum number of generations spent in
    /// a phase before switching.
    pub hold_phase: usize,
}

impl PhasedConfig {
    pub const fn zero() -> PhasedConfig {
        PhasedConfig {
            phase_threshold: 0.0,
            hold_phase: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_non_negative("phase-threshold", self.phase_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_configs_are_valid() {
        assert!(SeederConfig::zero().validate().is_ok());
        assert!(CrosserConfig::zero().validate().is_ok());
        assert!(DistancerConfig::zero().validate().is_ok());
        assert!(ComplexifyConfig::zero().validate().is_ok());
        assert!(WeightConfig::zero().validate().is_ok());
        assert!(BiasConfig::zero().validate().is_ok());
        assert!(TraitConfig::zero().validate().is_ok());
        assert!(ActivationConfig::zero().validate().is_ok());
        assert!(SimplifyConfig::zero().validate().is_ok());
        assert!(PhasedConfig::zero().validate().is_ok());
    }

    #[test]
    fn invalid_options_are_named() {
        let config = WeightConfig {
            weight_power: -1.0,
            ..WeightConfig::zero()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidPower {
                option: "weight-power",
                value: -1.0
            })
        );
        let config = ComplexifyConfig {
            add_node_probability: 2.0,
            ..ComplexifyConfig::zero()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability {
                option: "add-node-probability",
                ..
            })
        ));
    }
}
