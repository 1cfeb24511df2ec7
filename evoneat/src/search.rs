use crate::errors::Error;
use crate::genome::{Evaluation, GenomeId};
use crate::networks::Phenome;

use ahash::AHashSet;
use rayon::prelude::*;

/// Scores a single phenome. Failures are reported inside
/// the returned [`Evaluation`].
pub trait Evaluator<N>: Sync {
    fn evaluate(&self, phenome: &Phenome<N>) -> Evaluation;
}

impl<N, F> Evaluator<N> for F
where
    F: Fn(&Phenome<N>) -> Evaluation + Sync,
{
    fn evaluate(&self, phenome: &Phenome<N>) -> Evaluation {
        self(phenome)
    }
}

/// Evaluates a batch of phenomes.
pub trait Searcher<N>: Send + Sync {
    /// Returns one evaluation per phenome, in any order.
    ///
    /// # Errors
    /// An error aborts the run.
    fn search(&self, phenomes: &[Phenome<N>]) -> Result<Vec<Evaluation>, Error>;
}

/// Evaluates phenomes across all hardware threads.
///
/// # Examples
/// ```
/// use evoneat::{Evaluation, Parallel, Phenome, Searcher};
///
/// let searcher = Parallel::new(|p: &Phenome<f32>| Evaluation::new(p.id, p.network));
/// let phenomes: Vec<_> = (1..=4)
///     .map(|id| Phenome { id, traits: vec![], network: id as f32 })
///     .collect();
///
/// let mut results = searcher.search(&phenomes).unwrap();
/// results.sort_by_key(|e| e.genome_id);
/// assert_eq!(results[3].fitness, 4.0);
/// ```
#[derive(Clone, Debug)]
pub struct Parallel<E> {
    evaluator: E,
}

impl<E> Parallel<E> {
    pub fn new(evaluator: E) -> Parallel<E> {
        Parallel { evaluator }
    }
}

impl<N, E> Searcher<N> for Parallel<E>
where
    N: Send + Sync,
    E: Evaluator<N> + Send,
{
    fn search(&self, phenomes: &[Phenome<N>]) -> Result<Vec<Evaluation>, Error> {
        let results: Vec<Evaluation> = phenomes
            .par_iter()
            .map(|p| self.evaluator.evaluate(p))
            .collect();
        check_ids(phenomes, &results)?;
        Ok(results)
    }
}

/// Evaluates phenomes one by one on the calling thread.
#[derive(Clone, Debug)]
pub struct Serial<E> {
    evaluator: E,
}

impl<E> Serial<E> {
    pub fn new(evaluator: E) -> Serial<E> {
        Serial { evaluator }
    }
}

impl<N, E> Searcher<N> for Serial<E>
where
    N: Send + Sync,
    E: Evaluator<N> + Send,
{
    fn search(&self, phenomes: &[Phenome<N>]) -> Result<Vec<Evaluation>, Error> {
        let results: Vec<Evaluation> = phenomes
            .iter()
            .map(|p| self.evaluator.evaluate(p))
            .collect();
        check_ids(phenomes, &results)?;
        Ok(results)
    }
}

fn check_ids<N>(phenomes: &[Phenome<N>], results: &[Evaluation]) -> Result<(), Error> {
    let ids: AHashSet<GenomeId> = phenomes.iter().map(|p| p.id).collect();
    match results.iter().find(|e| !ids.contains(&e.genome_id)) {
        Some(stray) => Err(Error::Search(format!(
            "evaluation for unknown genome {}",
            stray.genome_id
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phenomes() -> Vec<Phenome<()>> {
        (1..=16)
            .map(|id| Phenome {
                id,
                traits: vec![],
                network: (),
            })
            .collect()
    }

    #[test]
    fn parallel_and_serial_agree() {
        let evaluator = |p: &Phenome<()>| Evaluation::new(p.id, p.id as f32 * 0.5);
        let mut parallel = Parallel::new(evaluator).search(&phenomes()).unwrap();
        let serial = Serial::new(evaluator).search(&phenomes()).unwrap();
        parallel.sort_by_key(|e| e.genome_id);
        assert_eq!(parallel, serial);
    }

    #[test]
    fn evaluator_failures_are_results() {
        let searcher = Serial::new(|p: &Phenome<()>| Evaluation::failed(p.id, "diverged"));
        let results = searcher.search(&phenomes()).unwrap();
        assert!(results.iter().all(|e| e.error.is_some()));
    }

    #[test]
    fn unknown_ids_abort_the_search() {
        let searcher = Parallel::new(|p: &Phenome<()>| Evaluation::new(p.id + 100, 1.0));
        assert!(matches!(searcher.search(&phenomes()), Err(Error::Search(_))));
    }
}
