use crate::errors::Error;
use crate::populations::Population;

use log::info;
use rayon::prelude::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Milestones of a run, published to every subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// The run has begun; the population is the initial one.
    Started,
    /// Every genome of the population has been transcribed.
    Decoded,
    /// Every genome of the population has been evaluated.
    Evaluated,
    /// A new generation has replaced the previous one.
    Advanced,
    /// The run is over; the population is the final one.
    Completed,
}

/// Shared flag through which a run is asked to stop.
///
/// Clones observe the same flag. The driver checks it
/// between stages and stops at the next stage boundary.
#[derive(Clone, Debug, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Cancellation {
        Cancellation::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Returns [`Error::Cancelled`] once cancelled.
    ///
    /// # Examples
    /// ```
    /// use evoneat::experiment::Cancellation;
    ///
    /// let cancellation = Cancellation::new();
    /// assert!(cancellation.checkpoint().is_ok());
    /// cancellation.clone().cancel();
    /// assert!(cancellation.checkpoint().is_err());
    /// ```
    pub fn checkpoint(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Receives run events. Subscribers see the population
/// read-only and may request cancellation.
pub trait Subscriber: Send + Sync {
    fn notify(&self, event: Event, population: &Population, cancellation: &Cancellation);
}

impl<F> Subscriber for F
where
    F: Fn(Event, &Population, &Cancellation) + Send + Sync,
{
    fn notify(&self, event: Event, population: &Population, cancellation: &Cancellation) {
        self(event, population, cancellation)
    }
}

/// The set of subscribers of a run.
#[derive(Default)]
pub struct Subscribers {
    subscribers: Vec<Box<dyn Subscriber>>,
}

impl Subscribers {
    pub fn new() -> Subscribers {
        Subscribers::default()
    }

    pub fn push(&mut self, subscriber: impl Subscriber + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Notifies every subscriber in parallel, returning
    /// once all of them are done.
    pub fn publish(&self, event: Event, population: &Population, cancellation: &Cancellation) {
        self.subscribers
            .par_iter()
            .for_each(|s| s.notify(event, population, cancellation));
    }
}

/// Cancels the run once the population reaches a
/// given generation.
#[derive(Clone, Copy, Debug)]
pub struct IterationLimit(pub usize);

impl Subscriber for IterationLimit {
    fn notify(&self, event: Event, population: &Population, cancellation: &Cancellation) {
        if matches!(event, Event::Started | Event::Advanced) && population.generation >= self.0 {
            info!("iteration limit {} reached", self.0);
            cancellation.cancel();
        }
    }
}

/// Cancels the run once any genome is solved.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolutionFound;

impl Subscriber for SolutionFound {
    fn notify(&self, event: Event, population: &Population, cancellation: &Cancellation) {
        if event == Event::Evaluated {
            if let Some(solver) = population.genomes.iter().find(|g| g.solved) {
                info!(
                    "genome {} solved the problem in generation {}",
                    solver.id, population.generation
                );
                cancellation.cancel();
            }
        }
    }
}
