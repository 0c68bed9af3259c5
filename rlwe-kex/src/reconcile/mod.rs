//! # Reconciliation Module
//!
//! Turns the noisy shared polynomial each party computes into identical bits
//! (with high probability). Each coefficient is decided independently:
//!
//! 1. the reference public key coefficient picks an interval: `bit_low` if it
//!    lies in one of the `select_low` intervals, `bit_high` otherwise;
//! 2. the bit is 1 exactly when the shared coefficient lies in that interval.
//!
//! All intervals are closed. For a real bound `f * q` the integer bounds are
//! `ceil(low * q)` and `floor(high * q)`, fixed at construction.

pub mod diagnostics;

use crate::keypair::{PrivateKey, PublicKey};
use crate::params::{Interval, KexParams};
use crate::ring::{PolyRing, Polynomial};

use itertools::{EitherOrBoth, Itertools};

use tracing::{debug, warn};

/// Per-run agreement below this rate points at misconfigured parameters.
pub const EXPECTED_AGREEMENT_RATE: f64 = 0.99;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Bounds {
    low: i64,
    high: i64,
}

impl Bounds {
    fn of(interval: &Interval, modulus: u64) -> Self {
        let (low, high) = interval.bounds(modulus);
        Self { low, high }
    }

    fn contains(&self, value: i64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Stateless reconciliation engine for one parameter set.
#[derive(Debug, Clone)]
pub struct Reconciler {
    ring: PolyRing,
    select_low: [Bounds; 2],
    bit_low: Bounds,
    bit_high: Bounds,
}

impl Reconciler {
    pub fn new(params: &KexParams) -> Self {
        let modulus = params.modulus();
        let intervals = params.intervals();

        Self {
            ring: params.ring(),
            select_low: [
                Bounds::of(&intervals.select_low[0], modulus),
                Bounds::of(&intervals.select_low[1], modulus),
            ],
            bit_low: Bounds::of(&intervals.bit_low, modulus),
            bit_high: Bounds::of(&intervals.bit_high, modulus),
        }
    }

    /// `peer_public * own_private`, approximately equal on both sides.
    pub fn compute_shared_value(&self, peer_public_key: &PublicKey, own_private_key: &PrivateKey) -> Polynomial {
        self.ring
            .multiply(&peer_public_key.polynomial, &own_private_key.polynomial)
    }

    /// True if the reference coefficient selects the low bit interval.
    pub fn selects_low(&self, reference_coefficient: i64) -> bool {
        let value = self.ring.ring().normalize(reference_coefficient);
        self.select_low.iter().any(|bounds| bounds.contains(value))
    }

    /// Bit for one coefficient position.
    pub fn reconcile_coefficient(&self, shared_coefficient: i64, reference_coefficient: i64) -> u8 {
        let value = self.ring.ring().normalize(shared_coefficient);
        let bounds = if self.selects_low(reference_coefficient) {
            &self.bit_low
        } else {
            &self.bit_high
        };

        bounds.contains(value) as u8
    }

    /// Maps every coefficient of `shared_value` to a bit, guided by `reference_public_key`.
    ///
    /// Both inputs are ring-reduced first, so terms of degree `N` and above
    /// fold back through `x^N = -1` like in any other ring operation.
    pub fn reconcile(&self, shared_value: &Polynomial, reference_public_key: &PublicKey) -> SharedKey {
        let shared_value = self.ring.ring_reduce(shared_value);
        let reference = self.ring.ring_reduce(&reference_public_key.polynomial);
        let bits: Vec<u8> = shared_value
            .coefficients()
            .iter()
            .zip(reference.coefficients())
            .map(|(&shared, &reference)| self.reconcile_coefficient(shared, reference))
            .collect();

        debug!(
            ones = bits.iter().filter(|&&b| b == 1).count(),
            total = bits.len(),
            "reconciled shared key"
        );
        SharedKey::new(bits)
    }

    /// Shared value and reconciliation in one step.
    pub fn compute_shared_key(
        &self,
        peer_public_key: &PublicKey,
        own_private_key: &PrivateKey,
        reference_public_key: &PublicKey,
    ) -> SharedKey {
        let shared_value = self.compute_shared_value(peer_public_key, own_private_key);
        self.reconcile(&shared_value, reference_public_key)
    }
}

/// Reconciled key material: one bit per ring coefficient.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SharedKey {
    bits: Vec<u8>,
}

impl SharedKey {
    fn new(bits: Vec<u8>) -> Self {
        Self { bits }
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// The key as a {0, 1} polynomial.
    pub fn to_polynomial(&self) -> Polynomial {
        Polynomial::new(self.bits.iter().map(|&b| b as i64).collect())
    }

    /// Bits packed least-significant first: bit `i` is `bytes[i / 8] >> (i % 8)`.
    ///
    /// # Example
    ///
    /// ```
    /// # use rlwe_kex::params::KexParams;
    /// # use rlwe_kex::reconcile::Reconciler;
    /// # use rlwe_kex::keypair::PublicKey;
    /// # use rlwe_kex::ring::Polynomial;
    /// let params = KexParams::try_with(8, 8000).unwrap();
    /// let reconciler = Reconciler::new(&params);
    /// // Reference coefficient 0 selects [1000, 5000].
    /// let reference = PublicKey::new(params.ring().zero());
    /// let shared = Polynomial::new(vec![1000, 0, 0, 0, 0, 0, 0, 5000]);
    /// let key = reconciler.reconcile(&shared, &reference);
    /// assert_eq!(key.to_bytes(), vec![0b1000_0001]);
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |byte, (i, &bit)| byte | ((bit & 1) << i))
            })
            .collect()
    }

    /// Coefficient-wise comparison with the other party's key.
    pub fn agreement(&self, other: &SharedKey) -> Agreement {
        let mismatched_positions: Vec<usize> = self
            .bits
            .iter()
            .zip_longest(other.bits.iter())
            .positions(|pair| match pair {
                EitherOrBoth::Both(a, b) => a != b,
                EitherOrBoth::Left(_) | EitherOrBoth::Right(_) => true,
            })
            .collect();

        let total = self.len().max(other.len());
        let agreement = Agreement {
            matching: total - mismatched_positions.len(),
            total,
            mismatched_positions,
        };
        if agreement.is_abnormal() {
            warn!(
                rate = agreement.rate(),
                mismatched = agreement.mismatched_positions.len(),
                "shared key agreement is abnormally low, check parameters"
            );
        }

        agreement
    }
}

/// Outcome of comparing two independently reconciled keys.
///
/// Mismatches are a probabilistic protocol outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agreement {
    pub matching: usize,
    pub total: usize,
    pub mismatched_positions: Vec<usize>,
}

impl Agreement {
    /// Fraction of agreeing positions; two empty keys agree fully.
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.matching as f64 / self.total as f64
    }

    /// Both parties hold the same key.
    pub fn is_exact(&self) -> bool {
        self.mismatched_positions.is_empty()
    }

    pub fn is_abnormal(&self) -> bool {
        self.rate() < EXPECTED_AGREEMENT_RATE
    }
}
