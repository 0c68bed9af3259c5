use crate::errors::RlweKexError;
use crate::preset::reference::{
    REFERENCE_INTERVALS, REFERENCE_MODULUS, REFERENCE_NOISE, REFERENCE_RING,
};
use crate::ring::PolyRing;

use num_traits::Float;

use serde::{Deserialize, Serialize};

/// Mean and standard deviation of a rounded continuous Gaussian.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianParams {
    pub mu: f64,
    pub sigma: f64,
}

impl GaussianParams {
    pub fn try_with(mu: f64, sigma: f64) -> Result<Self, RlweKexError> {
        let params = Self { mu, sigma };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), RlweKexError> {
        if !self.mu.is_finite() {
            return Err(RlweKexError::InvalidParameters(format!(
                "Gaussian mean must be finite, got {}",
                self.mu
            )));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(RlweKexError::InvalidParameters(format!(
                "Gaussian sigma must be finite and >= 0, got {}",
                self.sigma
            )));
        }
        Ok(())
    }
}

/// A closed interval `[low * q, high * q]`, given as fractions of the modulus.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    pub fn validate(&self) -> Result<(), RlweKexError> {
        let in_unit = |x: f64| x.is_finite() && (0.0..=1.0).contains(&x);
        if !in_unit(self.low) || !in_unit(self.high) || self.low > self.high {
            return Err(RlweKexError::InvalidParameters(format!(
                "Interval [{}, {}] must satisfy 0 <= low <= high <= 1",
                self.low, self.high
            )));
        }
        Ok(())
    }

    /// Integer bounds of the closed real interval: `ceil(low * q)` and `floor(high * q)`.
    ///
    /// The products are exact for every modulus, including those above 2^53.
    ///
    /// # Example
    ///
    /// ```
    /// # use rlwe_kex::params::Interval;
    /// let interval = Interval { low: 0.125, high: 0.625 };
    /// assert_eq!(interval.bounds(17), (3, 10));
    /// assert_eq!(interval.bounds(8000), (1000, 5000));
    /// ```
    pub fn bounds(&self, modulus: u64) -> (i64, i64) {
        let (_, low) = scale_fraction(self.low, modulus);
        let (high, _) = scale_fraction(self.high, modulus);
        (low as i64, high as i64)
    }
}

/// `(floor(fraction * modulus), ceil(fraction * modulus))` for a fraction in `[0, 1]`.
///
/// The fraction is decoded as `mantissa * 2^exponent` and the product kept in
/// `u128`: `mantissa < 2^53` and `modulus < 2^63`.
fn scale_fraction(fraction: f64, modulus: u64) -> (u64, u64) {
    let (mantissa, exponent, _) = fraction.integer_decode();
    let product = mantissa as u128 * modulus as u128;
    if exponent >= 0 {
        let scaled = (product << exponent) as u64;
        return (scaled, scaled);
    }

    let shift = exponent.unsigned_abs() as u32;
    if shift >= u128::BITS {
        return (0, (product != 0) as u64);
    }
    let floor = product >> shift;
    let exact = (product & ((1u128 << shift) - 1)) == 0;
    (floor as u64, (floor + u128::from(!exact)) as u64)
}

/// Intervals driving reconciliation.
///
/// A reference-key coefficient inside either `select_low` interval picks
/// `bit_low` for that position; otherwise `bit_high` applies.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationIntervals {
    pub select_low: [Interval; 2],
    pub bit_low: Interval,
    pub bit_high: Interval,
}

impl ReconciliationIntervals {
    pub fn validate(&self) -> Result<(), RlweKexError> {
        for interval in self.select_low.iter() {
            interval.validate()?;
        }
        self.bit_low.validate()?;
        self.bit_high.validate()
    }
}

/// Immutable configuration of one key-exchange session.
///
/// Both parties must use identical parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KexParams {
    ring: PolyRing,
    private_key: GaussianParams,
    error: GaussianParams,
    base_bounds: (i64, i64),
    intervals: ReconciliationIntervals,
}

impl KexParams {
    /// N = 1024, q = 2^32 - 1, sigma = 1 for both noise sources.
    pub fn reference() -> Self {
        let max = REFERENCE_MODULUS as i64 - 1;

        Self {
            ring: REFERENCE_RING,
            private_key: REFERENCE_NOISE,
            error: REFERENCE_NOISE,
            base_bounds: (-max, max),
            intervals: REFERENCE_INTERVALS,
        }
    }

    /// Parameters for dimension `N` and modulus `q` with reference noise,
    /// reference intervals and base bounds `[-q + 1, q - 1]`.
    ///
    /// # Errors
    ///
    /// Fails fast with `InvalidModulus` / `InvalidParameters` on an unusable ring.
    pub fn try_with(dimension: usize, modulus: u64) -> Result<Self, RlweKexError> {
        let ring = PolyRing::try_with(dimension, modulus)?;
        let max = modulus as i64 - 1;

        Ok(Self {
            ring,
            private_key: REFERENCE_NOISE,
            error: REFERENCE_NOISE,
            base_bounds: (-max, max),
            intervals: REFERENCE_INTERVALS,
        })
    }

    pub fn with_private_key_noise(mut self, noise: GaussianParams) -> Result<Self, RlweKexError> {
        noise.validate()?;
        self.private_key = noise;
        Ok(self)
    }

    pub fn with_error_noise(mut self, noise: GaussianParams) -> Result<Self, RlweKexError> {
        noise.validate()?;
        self.error = noise;
        Ok(self)
    }

    pub fn with_base_bounds(mut self, min: i64, max: i64) -> Result<Self, RlweKexError> {
        if min > max {
            return Err(RlweKexError::InvalidParameters(format!(
                "Base bounds [{}, {}] are empty",
                min, max
            )));
        }
        self.base_bounds = (min, max);
        Ok(self)
    }

    pub fn with_intervals(mut self, intervals: ReconciliationIntervals) -> Result<Self, RlweKexError> {
        intervals.validate()?;
        self.intervals = intervals;
        Ok(self)
    }

    pub fn ring(&self) -> PolyRing {
        self.ring
    }

    pub fn dimension(&self) -> usize {
        self.ring.dimension()
    }

    pub fn modulus(&self) -> u64 {
        self.ring.modulus()
    }

    pub fn private_key_noise(&self) -> &GaussianParams {
        &self.private_key
    }

    pub fn error_noise(&self) -> &GaussianParams {
        &self.error
    }

    pub fn base_bounds(&self) -> (i64, i64) {
        self.base_bounds
    }

    pub fn intervals(&self) -> &ReconciliationIntervals {
        &self.intervals
    }

    /// Re-checks every field, used after deserialization.
    pub fn validate(&self) -> Result<(), RlweKexError> {
        PolyRing::try_with(self.ring.dimension(), self.ring.modulus())?;
        self.private_key.validate()?;
        self.error.validate()?;
        if self.base_bounds.0 > self.base_bounds.1 {
            return Err(RlweKexError::InvalidParameters(format!(
                "Base bounds [{}, {}] are empty",
                self.base_bounds.0, self.base_bounds.1
            )));
        }
        self.intervals.validate()
    }

    /// Exports the parameters to a JSON string.
    pub fn to_json(&self) -> Result<String, RlweKexError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Imports parameters from a JSON string, rejecting invalid sets.
    pub fn from_json(json_str: &str) -> Result<Self, RlweKexError> {
        let params: KexParams = serde_json::from_str(json_str)?;
        params.validate()?;
        Ok(params)
    }
}
