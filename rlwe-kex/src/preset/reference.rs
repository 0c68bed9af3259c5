//! Reference parameter set: N = 1024, q = 2^32 - 1, unit Gaussian noise.

use crate::params::{GaussianParams, Interval, ReconciliationIntervals};
use crate::ring::PolyRing;

pub const REFERENCE_DIMENSION: usize = 1 << 10;
pub const REFERENCE_MODULUS: u64 = (1 << 32) - 1;

/// Z_q[x] / (x^1024 + 1) with q = 2^32 - 1.
pub const REFERENCE_RING: PolyRing = PolyRing::new_unchecked(REFERENCE_DIMENSION, REFERENCE_MODULUS);

/// Private keys and public-key errors both use D(0, 1).
pub const REFERENCE_NOISE: GaussianParams = GaussianParams {
    mu: 0.0,
    sigma: 1.0,
};

/// Select intervals `[0, 0.25q]` and `[0.5q, 0.75q]`, bit intervals
/// `[0.125q, 0.625q]` and `[0.375q, 0.875q]`.
pub const REFERENCE_INTERVALS: ReconciliationIntervals = ReconciliationIntervals {
    select_low: [
        Interval {
            low: 0.0,
            high: 0.25,
        },
        Interval {
            low: 0.5,
            high: 0.75,
        },
    ],
    bit_low: Interval {
        low: 0.125,
        high: 0.625,
    },
    bit_high: Interval {
        low: 0.375,
        high: 0.875,
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_intervals_are_consistent() {
        for interval in REFERENCE_INTERVALS
            .select_low
            .iter()
            .chain([&REFERENCE_INTERVALS.bit_low, &REFERENCE_INTERVALS.bit_high])
        {
            assert!(interval.validate().is_ok(), "{:?}", interval);
        }
    }

    #[test]
    fn test_bit_intervals_are_a_quarter_apart() {
        let shift = REFERENCE_INTERVALS.bit_high.low - REFERENCE_INTERVALS.bit_low.low;
        assert_eq!(shift, 0.25);
        assert_eq!(
            REFERENCE_INTERVALS.bit_high.high - REFERENCE_INTERVALS.bit_low.high,
            0.25
        );
    }

    #[test]
    fn test_reference_modulus_is_odd() {
        assert_eq!(REFERENCE_MODULUS % 2, 1);
        assert_eq!(REFERENCE_MODULUS, 4_294_967_295);
        assert!(REFERENCE_DIMENSION.is_power_of_two());
    }

    #[test]
    fn test_reference_ring_passes_validation() {
        let validated = PolyRing::try_with(REFERENCE_DIMENSION, REFERENCE_MODULUS);
        assert_eq!(validated.ok(), Some(REFERENCE_RING));
    }
}
