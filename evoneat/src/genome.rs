use crate::errors::StructuralError;
use crate::substrate::{Connection, Node, Substrate};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::convert::TryFrom;
use std::fmt;

/// Genome identifier, issued monotonically by the experiment driver.
pub type GenomeId = u64;

/// Species identifier, issued monotonically by the speciator.
pub type SpeciesId = u64;

/// Fitness assigned to genomes whose evaluation failed
/// or never took place.
pub const MIN_FITNESS: f32 = 0.0;

/// An individual of the population: an encoded substrate
/// plus everything learned about it during evaluation.
///
/// Each genome owns its substrates and traits. Only
/// `id`, `traits` and `encoded` need to persist; the rest
/// is recomputed every generation (see [`GenomeRecord`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub id: GenomeId,
    /// Set by the speciator. Children start without one.
    pub species_id: Option<SpeciesId>,
    pub fitness: f32,
    pub novelty: f32,
    pub solved: bool,
    /// Fixed-length vector of values in `[0, 1]`.
    pub traits: Vec<f32>,
    pub encoded: Substrate,
    pub decoded: Substrate,
}

impl Genome {
    /// Returns an unevaluated, unspeciated genome.
    ///
    /// # Examples
    /// ```
    /// use evoneat::Genome;
    /// use evoneat::substrate::Substrate;
    ///
    /// let genome = Genome::new(7, Substrate::new(), vec![0.5]);
    /// assert_eq!(genome.id, 7);
    /// assert_eq!(genome.species_id, None);
    /// assert_eq!(genome.fitness, 0.0);
    /// ```
    pub fn new(id: GenomeId, encoded: Substrate, traits: Vec<f32>) -> Genome {
        Genome {
            id,
            species_id: None,
            fitness: MIN_FITNESS,
            novelty: 0.0,
            solved: false,
            traits,
            encoded,
            decoded: Substrate::new(),
        }
    }

    /// Complexity of the encoded substrate.
    pub fn complexity(&self) -> usize {
        self.encoded.complexity()
    }

    /// Copies an evaluation's outcome onto the genome.
    ///
    /// Failed evaluations leave the genome at [`MIN_FITNESS`],
    /// zero novelty and unsolved. Negative or non-finite
    /// scores are clamped to zero.
    pub fn apply(&mut self, evaluation: &Evaluation) {
        if evaluation.error.is_some() {
            self.fitness = MIN_FITNESS;
            self.novelty = 0.0;
            self.solved = false;
        } else {
            self.fitness = non_negative(evaluation.fitness);
            self.novelty = non_negative(evaluation.novelty);
            self.solved = evaluation.solved;
        }
    }

    /// Clears the outcome of a previous evaluation.
    pub fn reset(&mut self) {
        self.fitness = MIN_FITNESS;
        self.novelty = 0.0;
        self.solved = false;
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Genome {} (species {}, fitness {:.4}, novelty {:.4}{}, complexity {})",
            self.id,
            self.species_id
                .map_or_else(|| "-".to_string(), |s| s.to_string()),
            self.fitness,
            self.novelty,
            if self.solved { ", solved" } else { "" },
            self.complexity(),
        )
    }
}

/// The minimal persisted form of a genome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenomeRecord {
    pub id: GenomeId,
    pub traits: Vec<f32>,
    pub nodes: Vec<Node>,
    pub conns: Vec<Connection>,
}

impl From<&Genome> for GenomeRecord {
    fn from(genome: &Genome) -> GenomeRecord {
        GenomeRecord {
            id: genome.id,
            traits: genome.traits.clone(),
            nodes: genome.encoded.nodes().to_vec(),
            conns: genome.encoded.conns().to_vec(),
        }
    }
}

impl TryFrom<GenomeRecord> for Genome {
    type Error = StructuralError;

    /// Rebuilds the genome, re-checking every substrate invariant.
    fn try_from(record: GenomeRecord) -> Result<Genome, StructuralError> {
        let encoded = Substrate::from_parts(record.nodes, record.conns)?;
        Ok(Genome::new(record.id, encoded, record.traits))
    }
}

/// Which genome score drives a ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Fitness,
    Novelty,
}

impl Comparison {
    /// The score of `genome` under this comparison.
    pub fn value(self, genome: &Genome) -> f32 {
        match self {
            Comparison::Fitness => genome.fitness,
            Comparison::Novelty => genome.novelty,
        }
    }
}

/// A failure raised inside user evaluation code.
#[derive(Clone, Debug, PartialEq, Error, Serialize, Deserialize)]
#[error("evaluation error: {0}")]
pub struct EvaluationError(pub String);

/// The outcome of evaluating one phenome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub genome_id: GenomeId,
    pub fitness: f32,
    pub novelty: f32,
    pub solved: bool,
    pub error: Option<EvaluationError>,
}

impl Evaluation {
    /// A successful evaluation with zero novelty.
    ///
    /// # Examples
    /// ```
    /// use evoneat::Evaluation;
    ///
    /// let evaluation = Evaluation::new(3, 12.5).solved(true);
    /// assert_eq!(evaluation.fitness, 12.5);
    /// assert!(evaluation.solved);
    /// assert!(evaluation.error.is_none());
    /// ```
    pub fn new(genome_id: GenomeId, fitness: f32) -> Evaluation {
        Evaluation {
            genome_id,
            fitness,
            novelty: 0.0,
            solved: false,
            error: None,
        }
    }

    /// A failed evaluation.
    pub fn failed(genome_id: GenomeId, error: impl Into<String>) -> Evaluation {
        Evaluation {
            genome_id,
            fitness: MIN_FITNESS,
            novelty: 0.0,
            solved: false,
            error: Some(EvaluationError(error.into())),
        }
    }

    pub fn with_novelty(mut self, novelty: f32) -> Evaluation {
        self.novelty = novelty;
        self
    }

    pub fn solved(mut self, solved: bool) -> Evaluation {
        self.solved = solved;
        self
    }
}
