//! # HyperNEAT
//! Indirect encoding for the [`evoneat`] engine.
//!
//! Genomes evolve as compositional pattern producing networks
//! (CPPNs). The [`HyperNeatTranscriber`] queries a genome's CPPN
//! with the coordinates of every candidate connection of a fixed
//! template substrate, producing the decoded substrate that is
//! then translated into a network as usual. [`CppnSeeder`] builds
//! the initial CPPNs, optionally biased towards local connectivity.

mod config;
mod inspection;
mod seeder;
mod transcriber;

pub use config::{HyperNeatConfig, Inspection, Locality};
pub use inspection::{BIAS, LEO, WEIGHT};
pub use seeder::CppnSeeder;
pub use transcriber::{HyperNeatTranscriber, CPPN_INPUTS};
