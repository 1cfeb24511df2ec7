use super::Mutator;
use crate::errors::{Error, VariationError};
use crate::genome::Genome;
use crate::genomics::ActivationConfig;
use crate::rng::RandomSource;
use crate::substrate::NodeKind;

/// Replaces the activation of hidden nodes with one drawn
/// uniformly from a configured set. Mostly useful when
/// evolving CPPNs.
#[derive(Clone, Debug)]
pub struct ActivationMutator {
    config: ActivationConfig,
}

impl ActivationMutator {
    /// # Errors
    /// Fails with [`VariationError::NoActivationsConfigured`]
    /// if the allowed set is empty.
    pub fn new(config: ActivationConfig) -> Result<ActivationMutator, Error> {
        config.validate()?;
        if config.activations.is_empty() {
            return Err(VariationError::NoActivationsConfigured.into());
        }
        Ok(ActivationMutator { config })
    }
}

impl Mutator for ActivationMutator {
    fn mutate(&self, rng: &mut RandomSource, genome: &mut Genome) -> Result<bool, Error> {
        let activations = &self.config.activations;
        for node in genome
            .encoded
            .nodes_mut()
            .filter(|n| n.kind() == NodeKind::Hidden && !n.locked)
        {
            if rng.gen_bool(self.config.replace_activation_probability) {
                node.activation = activations[rng.below(activations.len())];
            }
        }
        Ok(false)
    }
}
