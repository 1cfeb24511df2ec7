//! Variation of genomes: seeding, compatibility distance,
//! crossover and mutation.
mod config;
mod crossover;
mod distance;
pub mod mutators;
mod seeder;

pub use config::*;
pub use crossover::Crosser;
pub use distance::compatibility_distance;
pub use mutators::{
    ActivationMutator, BiasMutator, Complexify, Mutator, Mutators, Phase, Phased, Pruning,
    Simplify, TraitMutator, WeightMutator,
};
pub use seeder::{spread, NeatSeeder, Seeder};
