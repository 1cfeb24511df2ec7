use super::CrosserConfig;
use crate::errors::{Error, VariationError};
use crate::genome::Genome;
use crate::rng::RandomSource;
use crate::substrate::{align, Aligned, Substrate};

/// Produces a child from one or two parents.
///
/// Two-parent crossover is biased towards the fitter parent:
/// genes present only in the weaker parent are inherited only
/// when both parents score equally, while matched genes are
/// inherited from either parent with equal chance.
#[derive(Clone, Debug)]
pub struct Crosser {
    config: CrosserConfig,
}

impl Crosser {
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(config: CrosserConfig) -> Result<Crosser, Error> {
        config.validate()?;
        Ok(Crosser { config })
    }

    pub fn config(&self) -> &CrosserConfig {
        &self.config
    }

    /// Returns the child of `parents`. The child has id 0 and
    /// no species; the caller issues its real id.
    ///
    /// # Errors
    /// Fails with [`VariationError::TooFewParents`] or
    /// [`VariationError::TooManyParents`] when not given one
    /// or two parents.
    ///
    /// # Examples
    /// ```
    /// use evoneat::{Genome, RandomSource};
    /// use evoneat::genomics::{Crosser, CrosserConfig};
    /// use evoneat::substrate::Substrate;
    ///
    /// let crosser = Crosser::new(CrosserConfig::zero()).unwrap();
    /// let parent = Genome::new(9, Substrate::new(), vec![0.1, 0.2]);
    ///
    /// let child = crosser.cross(&mut RandomSource::seeded(0), &[&parent]).unwrap();
    /// assert_eq!(child.traits, parent.traits);
    /// assert_eq!(child.id, 0);
    /// ```
    pub fn cross(&self, rng: &mut RandomSource, parents: &[&Genome]) -> Result<Genome, Error> {
        match parents {
            [] => Err(VariationError::TooFewParents.into()),
            [parent] => Ok(Genome::new(0, parent.encoded.clone(), parent.traits.clone())),
            [first, second] => self.mate(rng, first, second),
            _ => Err(VariationError::TooManyParents(parents.len()).into()),
        }
    }

    fn mate(
        &self,
        rng: &mut RandomSource,
        first: &Genome,
        second: &Genome,
    ) -> Result<Genome, Error> {
        let comparison = self.config.comparison;
        let (a, b) = (comparison.value(first), comparison.value(second));
        let equal = !self.config.disable_equal_parent_check && a == b;
        let (p1, p2) = if b > a { (second, first) } else { (first, second) };

        let mut nodes = vec![];
        for step in align(p1.encoded.nodes(), p2.encoded.nodes(), |n| n.position()) {
            match step {
                Aligned::Left(n) => nodes.push(n.clone()),
                Aligned::Right(n) if equal => nodes.push(n.clone()),
                Aligned::Right(_) => {}
                Aligned::Both(x, y) => nodes.push((if rng.gen_bool(0.5) { x } else { y }).clone()),
            }
        }

        let mut conns = vec![];
        for step in align(p1.encoded.conns(), p2.encoded.conns(), |c| c.key()) {
            match step {
                Aligned::Left(c) => conns.push(c.clone()),
                Aligned::Right(c) if equal => conns.push(c.clone()),
                Aligned::Right(_) => {}
                Aligned::Both(x, y) => {
                    let mut conn = (if rng.gen_bool(0.5) { x } else { y }).clone();
                    conn.enabled = x.enabled && y.enabled;
                    conns.push(conn);
                }
            }
        }
        for conn in conns.iter_mut().filter(|c| !c.enabled) {
            if rng.gen_bool(self.config.enable_probability) {
                conn.enabled = true;
            }
        }

        let traits = p1
            .traits
            .iter()
            .enumerate()
            .map(|(i, t)| match p2.traits.get(i) {
                Some(other) if rng.gen_bool(0.5) => *other,
                _ => *t,
            })
            .collect();

        let encoded = Substrate::from_parts(nodes, conns)?;
        Ok(Genome::new(0, encoded, traits))
    }
}
