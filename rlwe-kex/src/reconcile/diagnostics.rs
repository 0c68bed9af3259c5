//! Closeness measures for the two parties' shared values, before reconciliation.
//!
//! Everything is accumulated in `u128`, so no intermediate sum can overflow
//! for ring-reduced inputs of any supported dimension.

use crate::ring::{PolyRing, Polynomial};

/// Sum of squared centered differences `(a_i - b_i) mod q`, taken in `(-q/2, q/2]`.
///
/// For honest parties this is the squared norm of the accumulated noise.
///
/// # Example
///
/// ```
/// # use rlwe_kex::reconcile::diagnostics::centered_distance_squared;
/// # use rlwe_kex::ring::{PolyRing, Polynomial};
/// let ring = PolyRing::try_with(2, 17).unwrap();
/// let a = Polynomial::new(vec![16, 5]);
/// let b = Polynomial::new(vec![1, 5]);
/// // 16 - 1 = 15 = -2 mod 17
/// assert_eq!(centered_distance_squared(&ring, &a, &b), 4);
/// ```
pub fn centered_distance_squared(ring: &PolyRing, a: &Polynomial, b: &Polynomial) -> u128 {
    let difference = ring.sub(a, b);
    difference
        .coefficients()
        .iter()
        .map(|&c| {
            let centered = ring.ring().center(c).unsigned_abs() as u128;
            centered * centered
        })
        .sum()
}

/// Cosine similarity of the reduced coefficient vectors.
///
/// Dot product and norms are exact integers; only the final ratio is a float.
/// Returns `0.0` when either polynomial is zero.
pub fn cosine_similarity(ring: &PolyRing, a: &Polynomial, b: &Polynomial) -> f64 {
    let a = ring.ring_reduce(a);
    let b = ring.ring_reduce(b);

    let (dot, norm_a, norm_b) = a.coefficients().iter().zip(b.coefficients()).fold(
        (0u128, 0u128, 0u128),
        |(dot, norm_a, norm_b), (&x, &y)| {
            let (x, y) = (x as u128, y as u128);
            (dot + x * y, norm_a + x * x, norm_b + y * y)
        },
    );

    if norm_a == 0 || norm_b == 0 {
        return 0.0;
    }
    dot as f64 / ((norm_a as f64).sqrt() * (norm_b as f64).sqrt())
}
