use crate::genome::GenomeId;
use crate::substrate::Position;

use thiserror::Error;

use std::fmt;

/// Errors surfaced by the evolutionary engine.
///
/// Evaluation failures are deliberately absent: they are
/// carried inside [`Evaluation`](crate::Evaluation) records
/// and never abort a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Variation(#[from] VariationError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// The searcher could not produce results for a batch.
    #[error("search error: {0}")]
    Search(String),
    /// The run's cancellation token was triggered.
    #[error("cancellation: run cancelled")]
    Cancelled,
    /// An activation name or index outside the supported set.
    #[error("programming error: invalid activation `{0}`")]
    InvalidActivation(String),
}

/// Missing or invalid configuration options.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("config error: compatibility threshold {0} is negative")]
    NegativeThreshold(f32),
    #[error("config error: `{option}` must be a non-negative power, got {value}")]
    InvalidPower { option: &'static str, value: f32 },
    #[error("config error: `{option}` must be a probability in [0, 1], got {value}")]
    InvalidProbability { option: &'static str, value: f32 },
    #[error("config error: `{option}` must be non-negative, got {value}")]
    Negative { option: &'static str, value: f32 },
    #[error("config error: `{option}` must be strictly positive, got {value}")]
    NonPositive { option: &'static str, value: f32 },
    #[error("config error: {0}")]
    Parse(String),
}

impl ConfigError {
    pub(crate) fn check_probability(option: &'static str, value: f32) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::InvalidProbability { option, value })
        }
    }

    pub(crate) fn check_power(option: &'static str, value: f32) -> Result<(), ConfigError> {
        if value >= 0.0 && value.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::InvalidPower { option, value })
        }
    }

    pub(crate) fn check_non_negative(option: &'static str, value: f32) -> Result<(), ConfigError> {
        if value >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::Negative { option, value })
        }
    }
}

/// A substrate that violates one of its invariants,
/// or cannot be used where it was passed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructuralError {
    #[error("structural error: substrate is empty")]
    Empty,
    #[error("structural error: substrate has no input nodes")]
    NoInputs,
    #[error("structural error: substrate has no output nodes")]
    NoOutputs,
    #[error("structural error: template already contains connections")]
    HasExistingConns,
    #[error("structural error: duplicate node at {0}")]
    DuplicateNode(Position),
    #[error("structural error: duplicate connection {0} -> {1}")]
    DuplicateConn(Position, Position),
    #[error("structural error: connection endpoint {0} is not a node of the substrate")]
    MissingEndpoint(Position),
    #[error("structural error: connection {from} -> {to} is not feed-forward ({reason})")]
    NotFeedForward {
        from: Position,
        to: Position,
        reason: &'static str,
    },
    #[error("structural error: expected {expected} columns, got {actual}")]
    Width { expected: usize, actual: usize },
}

/// Failures of the variation operators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VariationError {
    #[error("variation error: crossover needs at least one parent")]
    TooFewParents,
    #[error("variation error: crossover takes at most two parents, got {0}")]
    TooManyParents(usize),
    #[error("variation error: no activations configured for activation mutation")]
    NoActivationsConfigured,
}

/// Stage of a generation in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Selection,
    Variation,
    Speciation,
    Transcription,
    Translation,
    Search,
    Update,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Selection => "selection",
            Self::Variation => "variation",
            Self::Speciation => "speciation",
            Self::Transcription => "transcription",
            Self::Translation => "translation",
            Self::Search => "search",
            Self::Update => "update",
        };
        f.write_str(name)
    }
}

/// A single genome's failure within a generation.
#[derive(Debug, Error)]
#[error("genome {genome_id} failed during {stage}: {error}")]
pub struct GenomeFailure {
    pub genome_id: GenomeId,
    pub stage: Stage,
    #[source]
    pub error: Box<Error>,
}

impl GenomeFailure {
    pub fn new(genome_id: GenomeId, stage: Stage, error: impl Into<Error>) -> GenomeFailure {
        GenomeFailure {
            genome_id,
            stage,
            error: Box::new(error.into()),
        }
    }
}

/// Composite of every per-genome failure in one generation.
#[derive(Debug, Error)]
pub struct GenerationError {
    pub generation: usize,
    pub failures: Vec<GenomeFailure>,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generation {} had {} failing genome(s)",
            self.generation,
            self.failures.len()
        )?;
        for failure in &self.failures {
            write!(f, "\n\t{}", failure)?;
        }
        Ok(())
    }
}
