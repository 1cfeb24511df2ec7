use super::Mutator;
use crate::errors::Error;
use crate::genome::Genome;
use crate::genomics::{BiasConfig, TraitConfig, WeightConfig};
use crate::rng::RandomSource;
use crate::substrate::NodeKind;

/// Replaces a value with a fresh sample, or perturbs it,
/// then clips it to `[-bound, bound]`.
fn resample(
    rng: &mut RandomSource,
    value: f32,
    replace_probability: f32,
    power: f32,
    bound: f32,
) -> f32 {
    let value = if rng.gen_bool(replace_probability) {
        rng.normal(power)
    } else {
        value + rng.normal(power)
    };
    value.clamp(-bound.abs(), bound.abs())
}

/// Perturbs or replaces connection weights.
#[derive(Clone, Debug)]
pub struct WeightMutator {
    config: WeightConfig,
}

impl WeightMutator {
    pub fn new(config: WeightConfig) -> Result<WeightMutator, Error> {
        config.validate()?;
        Ok(WeightMutator { config })
    }
}

impl Mutator for WeightMutator {
    fn mutate(&self, rng: &mut RandomSource, genome: &mut Genome) -> Result<bool, Error> {
        let config = &self.config;
        for conn in genome.encoded.conns_mut().filter(|c| !c.locked) {
            if rng.gen_bool(config.mutate_weight_probability) {
                conn.weight = resample(
                    rng,
                    conn.weight,
                    config.replace_weight_probability,
                    config.weight_power,
                    config.max_weight,
                );
            }
        }
        Ok(false)
    }
}

/// Perturbs or replaces the biases of hidden and output nodes.
#[derive(Clone, Debug)]
pub struct BiasMutator {
    config: BiasConfig,
}

impl BiasMutator {
    pub fn new(config: BiasConfig) -> Result<BiasMutator, Error> {
        config.validate()?;
        Ok(BiasMutator { config })
    }
}

impl Mutator for BiasMutator {
    fn mutate(&self, rng: &mut RandomSource, genome: &mut Genome) -> Result<bool, Error> {
        let config = &self.config;
        for node in genome
            .encoded
            .nodes_mut()
            .filter(|n| n.kind() != NodeKind::Input && !n.locked)
        {
            if rng.gen_bool(config.mutate_bias_probability) {
                node.bias = resample(
                    rng,
                    node.bias,
                    config.replace_bias_probability,
                    config.bias_power,
                    config.max_bias,
                );
            }
        }
        Ok(false)
    }
}

/// Perturbs or replaces trait values, keeping them in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct TraitMutator {
    config: TraitConfig,
}

impl TraitMutator {
    pub fn new(config: TraitConfig) -> Result<TraitMutator, Error> {
        config.validate()?;
        Ok(TraitMutator { config })
    }
}

impl Mutator for TraitMutator {
    fn mutate(&self, rng: &mut RandomSource, genome: &mut Genome) -> Result<bool, Error> {
        for value in genome.traits.iter_mut() {
            if rng.gen_bool(self.config.mutate_trait_probability) {
                *value = if rng.gen_bool(self.config.replace_trait_probability) {
                    rng.uniform()
                } else {
                    (*value + rng.normal(1.0)).clamp(0.0, 1.0)
                };
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substrate::{Activation, Connection, Node, Position, Substrate};

    const I: Position = Position::planar(0.0, 0.0);
    const O: Position = Position::planar(1.0, 0.5);

    fn genome() -> Genome {
        let encoded = Substrate::from_parts(
            vec![Node::input(I), Node::output(O, Activation::Sigmoid, 0.5)],
            vec![Connection::new(I, O, 0.5)],
        )
        .unwrap();
        Genome::new(1, encoded, vec![0.5, 0.5])
    }

    #[test]
    fn weights_stay_within_bounds() {
        let mutator = WeightMutator::new(WeightConfig {
            mutate_weight_probability: 1.0,
            replace_weight_probability: 0.0,
            weight_power: 50.0,
            max_weight: 2.0,
        })
        .unwrap();
        let mut genome = genome();
        let mut rng = RandomSource::seeded(6);
        for _ in 0..50 {
            assert!(!mutator.mutate(&mut rng, &mut genome).unwrap());
            assert!(genome.encoded.conns()[0].weight.abs() <= 2.0);
        }
    }

    #[test]
    fn locked_connections_are_untouched() {
        let mutator = WeightMutator::new(WeightConfig {
            mutate_weight_probability: 1.0,
            weight_power: 1.0,
            max_weight: 10.0,
            ..WeightConfig::zero()
        })
        .unwrap();
        let mut genome = genome();
        genome.encoded.conn_mut(I, O).unwrap().locked = true;
        mutator.mutate(&mut RandomSource::seeded(6), &mut genome).unwrap();
        assert_eq!(genome.encoded.conns()[0].weight, 0.5);
    }

    #[test]
    fn input_biases_are_untouched() {
        let mutator = BiasMutator::new(BiasConfig {
            mutate_bias_probability: 1.0,
            replace_bias_probability: 1.0,
            bias_power: 1.0,
            max_bias: 5.0,
        })
        .unwrap();
        let mut genome = genome();
        mutator.mutate(&mut RandomSource::seeded(2), &mut genome).unwrap();
        assert_eq!(genome.encoded.node(I).unwrap().bias, 0.0);
        assert_ne!(genome.encoded.node(O).unwrap().bias, 0.5);
    }

    #[test]
    fn traits_stay_in_unit_interval() {
        let mutator = TraitMutator::new(TraitConfig {
            mutate_trait_probability: 1.0,
            replace_trait_probability: 0.0,
        })
        .unwrap();
        let mut genome = genome();
        let mut rng = RandomSource::seeded(9);
        for _ in 0..50 {
            mutator.mutate(&mut rng, &mut genome).unwrap();
            assert!(genome.traits.iter().all(|t| (0.0..=1.0).contains(t)));
        }
    }
}
