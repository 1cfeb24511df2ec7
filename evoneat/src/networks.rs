use crate::errors::Error;
use crate::genome::GenomeId;
use crate::substrate::Substrate;

/// Builds an executable network from a decoded substrate.
pub trait Translator: Send + Sync {
    type Network: Send + Sync;

    fn translate(&self, decoded: &Substrate) -> Result<Self::Network, Error>;
}

/// The evaluable form of a genome.
#[derive(Clone, Debug)]
pub struct Phenome<N> {
    pub id: GenomeId,
    pub traits: Vec<f32>,
    pub network: N,
}
