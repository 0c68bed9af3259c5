//! Polynomial arithmetic in Z_q[x] / (x^N + 1).

use crate::errors::RlweKexError;
use crate::ring::helper::{coefficient_at, map_vector};
use crate::ring::{Ring, Vector};

use itertools::{EitherOrBoth, Itertools};

use serde::{Deserialize, Serialize};

use std::ops::Index;

/// A polynomial stored as its coefficients, index = degree.
///
/// Outputs of [`PolyRing`] operations are always dense: exactly `N`
/// coefficients, each in `[0, q)`. Equality is coefficient-wise over the
/// stored vector, so compare ring outputs against dense polynomials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polynomial {
    coefficients: Vector,
}

impl Polynomial {
    pub fn new(coefficients: Vector) -> Self {
        Self { coefficients }
    }

    /// The all-zero polynomial with `dimension` coefficients.
    pub fn zero(dimension: usize) -> Self {
        Self::new(vec![0; dimension])
    }

    pub fn coefficients(&self) -> &[i64] {
        &self.coefficients
    }

    pub fn into_coefficients(self) -> Vector {
        self.coefficients
    }

    /// Coefficient of `x^degree`; zero past the stored length.
    pub fn coefficient(&self, degree: usize) -> i64 {
        coefficient_at(&self.coefficients, degree)
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Degree of the highest non-zero term, `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coefficients.iter().rposition(|&c| c != 0)
    }

    pub fn is_zero(&self) -> bool {
        self.degree().is_none()
    }
}

impl From<Vector> for Polynomial {
    fn from(coefficients: Vector) -> Self {
        Self::new(coefficients)
    }
}

impl Index<usize> for Polynomial {
    type Output = i64;

    fn index(&self, degree: usize) -> &Self::Output {
        &self.coefficients[degree]
    }
}

/// The quotient ring Z_q[x] / (x^N + 1).
///
/// Every operation is pure and returns a new ring-reduced [`Polynomial`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPolyRing")]
pub struct PolyRing {
    ring: Ring,
    dimension: usize,
}

#[derive(Deserialize)]
struct RawPolyRing {
    ring: Ring,
    dimension: usize,
}

impl TryFrom<RawPolyRing> for PolyRing {
    type Error = RlweKexError;

    fn try_from(raw: RawPolyRing) -> Result<Self, Self::Error> {
        PolyRing::try_with(raw.dimension, raw.ring.modulus())
    }
}

impl PolyRing {
    /// Creates the ring for dimension `N` and coefficient modulus `q`.
    ///
    /// # Errors
    ///
    /// * `InvalidModulus` if `q <= 1` or `q` does not fit in `i64`.
    /// * `InvalidParameters` if `N` is zero or not a power of two, or if a
    ///   full convolution (`N * (q - 1)^2`) would not fit the `i128` accumulator.
    ///
    /// # Example
    ///
    /// ```
    /// # use rlwe_kex::ring::PolyRing;
    /// assert!(PolyRing::try_with(1024, 4_294_967_295).is_ok());
    /// assert!(PolyRing::try_with(0, 17).is_err());
    /// assert!(PolyRing::try_with(6, 17).is_err());
    /// assert!(PolyRing::try_with(4, 1).is_err());
    /// ```
    pub fn try_with(dimension: usize, modulus: u64) -> Result<Self, RlweKexError> {
        let ring = Ring::try_with(modulus)?;

        if dimension == 0 || !dimension.is_power_of_two() {
            return Err(RlweKexError::InvalidParameters(format!(
                "Ring dimension must be a positive power of two, got {}",
                dimension
            )));
        }

        let max_coefficient = (modulus - 1) as u128;
        let headroom = max_coefficient
            .checked_mul(max_coefficient)
            .and_then(|square| square.checked_mul(dimension as u128))
            .filter(|&bound| bound <= i128::MAX as u128);
        if headroom.is_none() {
            return Err(RlweKexError::InvalidParameters(format!(
                "Convolution of dimension {} over modulus {} overflows the accumulator",
                dimension, modulus
            )));
        }

        Ok(Self { ring, dimension })
    }

    /// Skips validation; only for parameters already known to pass [`PolyRing::try_with`].
    pub(crate) const fn new_unchecked(dimension: usize, modulus: u64) -> Self {
        Self {
            ring: Ring::new_unchecked(modulus),
            dimension,
        }
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn modulus(&self) -> u64 {
        self.ring.modulus()
    }

    pub fn zero(&self) -> Polynomial {
        Polynomial::zero(self.dimension)
    }

    /// The ideal `x^N + 1`: ones at degree 0 and degree N.
    pub fn ideal(&self) -> Polynomial {
        let mut coefficients = vec![0; self.dimension + 1];
        coefficients[0] = 1;
        coefficients[self.dimension] = 1;
        Polynomial::new(coefficients)
    }

    /// True if `p` has at most `N` coefficients and all of them lie in `[0, q)`.
    pub fn is_reduced(&self, p: &Polynomial) -> bool {
        let q = self.modulus() as i64;
        p.len() <= self.dimension && p.coefficients().iter().all(|&c| (0..q).contains(&c))
    }

    /// Validates externally supplied coefficients and pads them to a dense ring element.
    pub fn try_polynomial(&self, coefficients: Vector) -> Result<Polynomial, RlweKexError> {
        if coefficients.len() > self.dimension {
            return Err(RlweKexError::DimensionMismatch(format!(
                "Polynomial has {} coefficients but the ring dimension is {}",
                coefficients.len(),
                self.dimension
            )));
        }
        let q = self.modulus() as i64;
        if let Some(position) = coefficients.iter().position(|c| !(0..q).contains(c)) {
            return Err(RlweKexError::InvalidParameters(format!(
                "Coefficient {} at degree {} is outside [0, {})",
                coefficients[position], position, q
            )));
        }

        let mut dense = coefficients;
        dense.resize(self.dimension, 0);
        Ok(Polynomial::new(dense))
    }

    /// Maps every coefficient into `[0, q)`. The length is preserved.
    ///
    /// # Example
    ///
    /// ```
    /// # use rlwe_kex::ring::{PolyRing, Polynomial};
    /// let ring = PolyRing::try_with(4, 17).unwrap();
    /// let reduced = ring.reduce_mod_q(&Polynomial::new(vec![-1, 17, 35, 4]));
    /// assert_eq!(reduced.coefficients(), &[16, 0, 1, 4]);
    /// ```
    pub fn reduce_mod_q(&self, p: &Polynomial) -> Polynomial {
        let ring = &self.ring;
        Polynomial::new(map_vector(p.coefficients(), &|c| ring.normalize(c)))
    }

    /// Remainder of `p` divided by `x^N + 1`, reduced mod q.
    ///
    /// A term of degree `d >= N` lands on degree `d mod N`, negated once for
    /// every wrap since `x^N = -1`.
    ///
    /// # Example
    ///
    /// ```
    /// # use rlwe_kex::ring::{PolyRing, Polynomial};
    /// let ring = PolyRing::try_with(2, 17).unwrap();
    /// // 1 + 2x + 3x^2 + 4x^3 = (1 - 3) + (2 - 4)x
    /// let folded = ring.reduce_mod_ideal(&Polynomial::new(vec![1, 2, 3, 4]));
    /// assert_eq!(folded.coefficients(), &[15, 15]);
    /// ```
    pub fn reduce_mod_ideal(&self, p: &Polynomial) -> Polynomial {
        let wide: Vec<i128> = p.coefficients().iter().map(|&c| c as i128).collect();
        self.fold(&wide)
    }

    /// Full reduction: mod q, then through the ideal, then mod q again.
    pub fn ring_reduce(&self, p: &Polynomial) -> Polynomial {
        self.reduce_mod_ideal(&self.reduce_mod_q(p))
    }

    /// Coefficient-wise `a + b`, ring-reduced.
    pub fn add(&self, a: &Polynomial, b: &Polynomial) -> Polynomial {
        self.combine(a, b, Ring::add)
    }

    /// Coefficient-wise `a - b`, ring-reduced.
    pub fn sub(&self, a: &Polynomial, b: &Polynomial) -> Polynomial {
        self.combine(a, b, Ring::sub)
    }

    /// Additive inverse of `p`.
    pub fn neg(&self, p: &Polynomial) -> Polynomial {
        let reduced = self.ring_reduce(p);
        let ring = &self.ring;
        Polynomial::new(map_vector(reduced.coefficients(), &|c| ring.neg(c)))
    }

    /// Product `a * b` in the ring.
    ///
    /// Both operands are ring-reduced first, so the convolution has at most
    /// `2N - 1` terms and every output slot sums at most `N` products below
    /// `q^2`, which [`PolyRing::try_with`] guarantees fits in `i128`.
    ///
    /// # Example
    ///
    /// ```
    /// # use rlwe_kex::ring::{PolyRing, Polynomial};
    /// let ring = PolyRing::try_with(2, 17).unwrap();
    /// // (3 + 5x)(2 + x) = 6 + 13x + 5x^2 = 1 + 13x
    /// let product = ring.multiply(&Polynomial::new(vec![3, 5]), &Polynomial::new(vec![2, 1]));
    /// assert_eq!(product.coefficients(), &[1, 13]);
    /// ```
    pub fn multiply(&self, a: &Polynomial, b: &Polynomial) -> Polynomial {
        let a = self.ring_reduce(a);
        let b = self.ring_reduce(b);

        let mut product = vec![0i128; 2 * self.dimension - 1];
        for (i, &x) in a.coefficients().iter().enumerate() {
            if x == 0 {
                continue;
            }
            let x = x as i128;
            for (j, &y) in b.coefficients().iter().enumerate() {
                product[i + j] += x * y as i128;
            }
        }

        self.fold(&product)
    }

    fn combine(&self, a: &Polynomial, b: &Polynomial, op: impl Fn(&Ring, i64, i64) -> i64) -> Polynomial {
        let wide: Vec<i128> = a
            .coefficients()
            .iter()
            .zip_longest(b.coefficients())
            .map(|pair| {
                let (x, y) = match pair {
                    EitherOrBoth::Both(&x, &y) => (x, y),
                    EitherOrBoth::Left(&x) => (x, 0),
                    EitherOrBoth::Right(&y) => (0, y),
                };
                op(&self.ring, x, y) as i128
            })
            .collect();

        self.fold(&wide)
    }

    /// Folds wide coefficients through `x^N = -1` and normalizes mod q.
    fn fold(&self, wide: &[i128]) -> Polynomial {
        let n = self.dimension;
        let mut folded = vec![0i128; n];
        for (degree, &c) in wide.iter().enumerate() {
            let slot = &mut folded[degree % n];
            if (degree / n) % 2 == 0 {
                *slot += c;
            } else {
                *slot -= c;
            }
        }

        Polynomial::new(
            folded
                .into_iter()
                .map(|c| self.ring.normalize_wide(c))
                .collect(),
        )
    }
}
