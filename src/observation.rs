//! Partial observation of an infected population
//!
//! Each infected node is reported independently with probability `p`.

use crate::error::{check_probability, Result};
use crate::graph::{Node, NodeSet};
use rand::Rng;
use tracing::debug;

/// Draws the observed subset of an infected set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationSampler {
    probability: f64,
}

impl ObservationSampler {
    /// Create a sampler that keeps each node with `probability`.
    pub fn new(probability: f64) -> Result<Self> {
        check_probability("observation probability", probability)?;
        Ok(Self { probability })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// One Bernoulli trial per infected node, in the set's order.
    pub fn sample<N, R>(&self, infected: &NodeSet<N>, rng: &mut R) -> NodeSet<N>
    where
        N: Node,
        R: Rng + ?Sized,
    {
        let observed: NodeSet<N> = infected
            .iter()
            .filter(|_| rng.gen_bool(self.probability))
            .cloned()
            .collect();

        debug!(
            infected = infected.len(),
            observed = observed.len(),
            probability = self.probability,
            "Sampled observed infections"
        );
        observed
    }
}

/// Observe each node of `infected` independently with probability `p`.
pub fn observe<N, R>(infected: &NodeSet<N>, p: f64, rng: &mut R) -> Result<NodeSet<N>>
where
    N: Node,
    R: Rng + ?Sized,
{
    Ok(ObservationSampler::new(p)?.sample(infected, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LocalizationError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn infected(n: u32) -> NodeSet<u32> {
        (0..n).collect()
    }

    #[test]
    fn test_probability_limits() {
        let mut rng = StdRng::seed_from_u64(5);
        let all = infected(50);

        assert!(observe(&all, 0.0, &mut rng).unwrap().is_empty());
        assert_eq!(observe(&all, 1.0, &mut rng).unwrap(), all);
    }

    #[test]
    fn test_empty_input() {
        let mut rng = StdRng::seed_from_u64(5);
        let none: NodeSet<u32> = NodeSet::new();
        assert!(observe(&none, 0.7, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_observed_is_subset() {
        let mut rng = StdRng::seed_from_u64(11);
        let all = infected(200);
        let observed = observe(&all, 0.3, &mut rng).unwrap();
        assert!(observed.is_subset(&all));
        // 200 draws at p = 0.3: far outside these bounds is a broken sampler.
        assert!(observed.len() > 20 && observed.len() < 100, "observed {}", observed.len());
    }

    #[test]
    fn test_invalid_probability() {
        assert!(matches!(
            ObservationSampler::new(-0.5),
            Err(LocalizationError::Configuration(_))
        ));
        assert!(ObservationSampler::new(f64::NAN).is_err());
    }
}
