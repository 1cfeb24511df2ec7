use evoneat::ConfigError;

use serde::{Deserialize, Serialize};

/// How a CPPN output row is read as a candidate connection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Inspection {
    /// A dedicated link-expression output decides whether
    /// the connection exists.
    LinkExpression,
    /// The connection exists where the weight output's
    /// magnitude exceeds the threshold.
    ConstantThreshold(f32),
}

impl Inspection {
    /// Number of CPPN outputs this inspection reads.
    pub fn output_count(&self) -> usize {
        match self {
            Inspection::LinkExpression => 3,
            Inspection::ConstantThreshold(_) => 2,
        }
    }
}

/// Coordinates along which seed CPPNs favour local connections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    pub layer: bool,
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl Locality {
    /// Indices into `[layer, x, y, z]` of the enabled flags.
    pub fn axes(&self) -> impl Iterator<Item = usize> {
        [self.layer, self.x, self.y, self.z]
            .into_iter()
            .enumerate()
            .filter_map(|(axis, enabled)| enabled.then(|| axis))
    }
}

/// CPPN-to-substrate generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HyperNeatConfig {
    /// Scale of generated connection weights.
    pub weight_power: f32,
    /// Scale of generated node biases.
    pub bias_power: f32,
    pub inspection: Inspection,
    /// Only used with [`Inspection::LinkExpression`].
    pub locality: Locality,
}

impl HyperNeatConfig {
    /// Returns a "zero-valued" default configuration.
    ///
    /// # Examples
    /// ```
    /// use hyperneat::{HyperNeatConfig, Inspection};
    ///
    /// let config = HyperNeatConfig {
    ///     weight_power: 3.0,
    ///     inspection: Inspection::ConstantThreshold(0.2),
    ///     ..HyperNeatConfig::zero()
    /// };
    /// assert!(config.validate().is_ok());
    /// ```
    pub const fn zero() -> HyperNeatConfig {
        HyperNeatConfig {
            weight_power: 0.0,
            bias_power: 0.0,
            inspection: Inspection::LinkExpression,
            locality: Locality {
                layer: false,
                x: false,
                y: false,
                z: false,
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let powers = [("weight-power", self.weight_power), ("bias-power", self.bias_power)];
        for (option, value) in powers {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidPower { option, value });
            }
        }
        match self.inspection {
            Inspection::ConstantThreshold(value) if !(value > 0.0) => Err(ConfigError::NonPositive {
                option: "inspection-threshold",
                value,
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_must_be_positive() {
        let config = HyperNeatConfig {
            inspection: Inspection::ConstantThreshold(0.0),
            ..HyperNeatConfig::zero()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NonPositive { .. })));
    }

    #[test]
    fn enabled_axes() {
        let locality = Locality {
            x: true,
            z: true,
            ..Locality::default()
        };
        assert_eq!(locality.axes().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn config_reads_from_ron() {
        let config: HyperNeatConfig = ron::from_str(
            "(weight_power: 3.0, bias_power: 1.0, inspection: ConstantThreshold(0.3), \
             locality: (layer: false, x: true, y: false, z: false))",
        )
        .unwrap();
        assert_eq!(config.inspection, Inspection::ConstantThreshold(0.3));
        assert!(config.locality.x);
    }
}
