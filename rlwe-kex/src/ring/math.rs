//! Coefficient arithmetic in Z_q.

use crate::errors::RlweKexError;

use serde::{Deserialize, Serialize};

/// Represents the coefficient ring Z_q using modular arithmetic.
///
/// Only constructed through [`Ring::try_with`]; deserialization goes through it too.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRing")]
pub struct Ring {
    modulus: u64,
}

#[derive(Deserialize)]
struct RawRing {
    modulus: u64,
}

impl TryFrom<RawRing> for Ring {
    type Error = RlweKexError;

    fn try_from(raw: RawRing) -> Result<Self, Self::Error> {
        Ring::try_with(raw.modulus)
    }
}

impl Ring {
    /// Create a new Ring with the given modulus.
    ///
    /// The modulus must be greater than 1 and representable as `i64`.
    pub fn try_with(modulus: u64) -> Result<Self, RlweKexError> {
        if modulus <= 1 {
            return Err(RlweKexError::InvalidModulus(format!(
                "Modulus must be greater than 1, got {}",
                modulus
            )));
        }
        if modulus > i64::MAX as u64 {
            return Err(RlweKexError::InvalidModulus(format!(
                "Modulus must fit in a signed 64-bit coefficient, got {}",
                modulus
            )));
        }

        Ok(Ring { modulus })
    }

    /// Skips validation; only for moduli already known to pass [`Ring::try_with`].
    pub(crate) const fn new_unchecked(modulus: u64) -> Self {
        Ring { modulus }
    }

    /// Returns the modulus of the ring.
    ///
    /// # Example
    ///
    /// ```
    /// # use rlwe_kex::ring::Ring;
    /// let ring = Ring::try_with(17).unwrap();
    /// assert_eq!(ring.modulus(), 17);
    /// ```
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Normalizes a value to be within the range `[0, modulus - 1]`.
    ///
    /// Negative remainders are lifted by adding the modulus.
    ///
    /// # Example
    ///
    /// ```
    /// # use rlwe_kex::ring::Ring;
    /// let ring = Ring::try_with(17).unwrap();
    /// assert_eq!(ring.normalize(20), 3);
    /// assert_eq!(ring.normalize(-1), 16);
    /// assert_eq!(ring.normalize(0), 0);
    /// assert_eq!(ring.normalize(17), 0);
    /// ```
    pub fn normalize(&self, value: i64) -> i64 {
        let m = self.modulus as i64;

        let rem = value % m;
        if rem < 0 {
            return rem + m;
        }

        rem
    }

    /// Same as [`Ring::normalize`] for a wide accumulator value.
    ///
    /// # Example
    ///
    /// ```
    /// # use rlwe_kex::ring::Ring;
    /// let ring = Ring::try_with(4_294_967_295).unwrap();
    /// let square = 4_294_967_294i128 * 4_294_967_294i128;
    /// assert_eq!(ring.normalize_wide(square), 1);
    /// assert_eq!(ring.normalize_wide(-square), 4_294_967_294);
    /// ```
    pub fn normalize_wide(&self, value: i128) -> i64 {
        let m = self.modulus as i128;

        let rem = value % m;
        if rem < 0 {
            return (rem + m) as i64;
        }

        rem as i64
    }

    /// Computes `(a + b) mod modulus`.
    ///
    /// # Example
    ///
    /// ```
    /// # use rlwe_kex::ring::Ring;
    /// let ring = Ring::try_with(17).unwrap();
    /// assert_eq!(ring.add(12, 9), 4);
    /// assert_eq!(ring.add(-2, 5), 3);
    /// ```
    pub fn add(&self, a: i64, b: i64) -> i64 {
        let a_norm = self.normalize(a) as i128;
        let b_norm = self.normalize(b) as i128;

        self.normalize_wide(a_norm + b_norm)
    }

    /// Computes `(a - b) mod modulus`.
    ///
    /// # Example
    ///
    /// ```
    /// # use rlwe_kex::ring::Ring;
    /// let ring = Ring::try_with(17).unwrap();
    /// assert_eq!(ring.sub(7, 5), 2);
    /// assert_eq!(ring.sub(3, 5), 15);
    /// ```
    pub fn sub(&self, a: i64, b: i64) -> i64 {
        let a_norm = self.normalize(a) as i128;
        let b_norm = self.normalize(b) as i128;

        self.normalize_wide(a_norm - b_norm)
    }

    /// Computes the additive inverse `-a mod modulus`.
    ///
    /// # Example
    ///
    /// ```
    /// # use rlwe_kex::ring::Ring;
    /// let ring = Ring::try_with(17).unwrap();
    /// assert_eq!(ring.neg(3), 14);
    /// assert_eq!(ring.neg(0), 0);
    /// assert!(ring.add(3, ring.neg(3)) == 0);
    /// ```
    pub fn neg(&self, a: i64) -> i64 {
        self.sub(0, a)
    }

    /// Maps a reduced value to its centered representative in `(-q/2, q/2]`.
    pub fn center(&self, value: i64) -> i64 {
        let m = self.modulus as i64;
        let v = self.normalize(value);
        if v > m / 2 { v - m } else { v }
    }
}
