//! # Sampler Module
//!
//! Draws ring elements from an injected randomness source: discrete Gaussian
//! noise for keys and errors, and the uniform base shared by both parties.

use crate::params::{GaussianParams, KexParams};
use crate::ring::{PolyRing, Polynomial, Vector};

use rand::Rng;
use rand_distr::StandardNormal;

use tracing::trace;

/// Rounds to the nearest integer, ties to even (`0.5 -> 0`, `1.5 -> 2`, `-2.5 -> -2`).
///
/// # Example
///
/// ```
/// # use rlwe_kex::sampler::round_half_even;
/// assert_eq!(round_half_even(0.5), 0);
/// assert_eq!(round_half_even(1.5), 2);
/// assert_eq!(round_half_even(-2.5), -2);
/// assert_eq!(round_half_even(-0.6), -1);
/// ```
pub fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Polynomial sampler owning its randomness source.
///
/// Given the same source state the output is fully deterministic, so tests
/// can pass a seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct Sampler<R: Rng> {
    ring: PolyRing,
    base_bounds: (i64, i64),
    rng: R,
}

impl<R: Rng> Sampler<R> {
    pub fn new(params: &KexParams, rng: R) -> Self {
        Self {
            ring: params.ring(),
            base_bounds: params.base_bounds(),
            rng,
        }
    }

    pub fn ring(&self) -> &PolyRing {
        &self.ring
    }

    /// N independent draws of `mu + sigma * Z`, rounded half-to-even and ring-reduced.
    pub fn discrete_gaussian(&mut self, noise: &GaussianParams) -> Polynomial {
        let samples: Vector = (0..self.ring.dimension())
            .map(|_| {
                let z: f64 = self.rng.sample(StandardNormal);
                round_half_even(noise.mu + noise.sigma * z)
            })
            .collect();
        trace!(mu = noise.mu, sigma = noise.sigma, "sampled discrete gaussian");

        self.ring.ring_reduce(&Polynomial::new(samples))
    }

    /// N integers uniform over the configured inclusive base bounds, ring-reduced.
    pub fn uniform_base(&mut self) -> Polynomial {
        let (min, max) = self.base_bounds;
        let samples: Vector = (0..self.ring.dimension())
            .map(|_| self.rng.random_range(min..=max))
            .collect();
        trace!(min, max, "sampled uniform base");

        self.ring.ring_reduce(&Polynomial::new(samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RlweKexError;
    use crate::preset::reference::REFERENCE_NOISE;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TEST_SEED: u64 = 42;

    fn sampler(params: &KexParams, seed: u64) -> Sampler<StdRng> {
        Sampler::new(params, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_gaussian_same_seed_same_output() {
        let params = KexParams::reference();
        let a = sampler(&params, TEST_SEED).discrete_gaussian(&REFERENCE_NOISE);
        let b = sampler(&params, TEST_SEED).discrete_gaussian(&REFERENCE_NOISE);
        assert_eq!(a, b);

        let c = sampler(&params, TEST_SEED + 1).discrete_gaussian(&REFERENCE_NOISE);
        assert_ne!(a, c);
    }

    #[test]
    fn test_uniform_base_same_seed_same_output() {
        let params = KexParams::reference();
        let a = sampler(&params, TEST_SEED).uniform_base();
        let b = sampler(&params, TEST_SEED).uniform_base();
        assert_eq!(a, b);
        assert_eq!(a.len(), 1024);
        assert!(params.ring().is_reduced(&a));
    }

    #[test]
    fn test_zero_sigma_is_constant() -> Result<(), RlweKexError> {
        let params = KexParams::try_with(8, 17)?;
        let mut sampler = sampler(&params, TEST_SEED);

        let zero = sampler.discrete_gaussian(&GaussianParams::try_with(0.0, 0.0)?);
        assert_eq!(zero, params.ring().zero());

        let shifted = sampler.discrete_gaussian(&GaussianParams::try_with(-2.0, 0.0)?);
        assert_eq!(shifted.coefficients(), &[15; 8]);

        let tie = sampler.discrete_gaussian(&GaussianParams::try_with(2.5, 0.0)?);
        assert_eq!(tie.coefficients(), &[2; 8]);
        Ok(())
    }

    #[test]
    fn test_gaussian_is_small_when_centered() {
        let params = KexParams::reference();
        let ring = params.ring();
        let noise = sampler(&params, TEST_SEED).discrete_gaussian(&REFERENCE_NOISE);

        let centered: Vec<i64> = noise
            .coefficients()
            .iter()
            .map(|&c| ring.ring().center(c))
            .collect();
        assert!(centered.iter().all(|c| c.abs() <= 8));

        let mean = centered.iter().sum::<i64>() as f64 / centered.len() as f64;
        assert!(mean.abs() < 0.2, "mean {}", mean);
        assert!(centered.iter().any(|&c| c < 0));
    }

    #[test]
    fn test_uniform_base_respects_narrow_bounds() -> Result<(), RlweKexError> {
        let params = KexParams::try_with(64, 17)?.with_base_bounds(-1, 1)?;
        let base = sampler(&params, TEST_SEED).uniform_base();
        assert!(base.coefficients().iter().all(|c| [0, 1, 16].contains(c)));
        assert!(base.coefficients().contains(&16));
        Ok(())
    }
}
