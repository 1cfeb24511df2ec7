use crate::Error;

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// An Activation names the transfer function a node
/// applies to its summed input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activation {
    // x
    Direct,
    // 1 / (1 + exp(-x))
    Sigmoid,
    // 1 / (1 + exp(-4.9x))
    SteepenedSigmoid,
    // tanh(x)
    Tanh,
    // x / (1 + |x|)
    InverseAbs,
    // sin(x)
    Sin,
    // exp(-2x²)
    Gauss,
    // max(0, x)
    ReLU,
}

impl Activation {
    /// Every supported activation.
    pub const ALL: [Activation; 8] = [
        Activation::Direct,
        Activation::Sigmoid,
        Activation::SteepenedSigmoid,
        Activation::Tanh,
        Activation::InverseAbs,
        Activation::Sin,
        Activation::Gauss,
        Activation::ReLU,
    ];

    /// Applies the activation function to `x`.
    ///
    /// # Examples
    /// ```
    /// use evoneat::substrate::Activation;
    ///
    /// assert_eq!(Activation::Sigmoid.apply(0.0), 0.5);
    /// assert_eq!(Activation::ReLU.apply(-3.0), 0.0);
    /// assert_eq!(Activation::InverseAbs.apply(1.0), 0.5);
    /// ```
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Self::Direct => x,
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::SteepenedSigmoid => 1.0 / (1.0 + (-4.9 * x).exp()),
            Self::Tanh => x.tanh(),
            Self::InverseAbs => x / (1.0 + x.abs()),
            Self::Sin => x.sin(),
            Self::Gauss => (-2.0 * x * x).exp(),
            Self::ReLU => x.max(0.0),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Sigmoid => "sigmoid",
            Self::SteepenedSigmoid => "steepened-sigmoid",
            Self::Tanh => "tanh",
            Self::InverseAbs => "inverse-abs",
            Self::Sin => "sin",
            Self::Gauss => "gauss",
            Self::ReLU => "relu",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Activation {
    type Err = Error;

    /// Parses the kebab-case activation name, ignoring case.
    ///
    /// # Errors
    /// Returns [`Error::InvalidActivation`] for names outside
    /// the supported set.
    fn from_str(s: &str) -> Result<Activation, Error> {
        let wanted = s.trim().to_ascii_lowercase();
        Activation::ALL
            .iter()
            .copied()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| Error::InvalidActivation(s.to_string()))
    }
}
