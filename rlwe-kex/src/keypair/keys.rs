use crate::codec::{decode_polynomial, encode_polynomial};
use crate::errors::RlweKexError;
use crate::ring::{PolyRing, Polynomial};

use serde::{Deserialize, Serialize};

/// Secret polynomial `s` with small (Gaussian) coefficients, stored mod q.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub polynomial: Polynomial,
}

/// Public polynomial `p = a * s + e`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub polynomial: Polynomial,
}

/// One party's keys for a single session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
}

impl PrivateKey {
    pub fn new(polynomial: Polynomial) -> Self {
        Self { polynomial }
    }
}

impl PublicKey {
    pub fn new(polynomial: Polynomial) -> Self {
        Self { polynomial }
    }

    /// Builds `ring_reduce(base * private + error)` from explicit parts.
    ///
    /// # Example
    ///
    /// ```
    /// # use rlwe_kex::keypair::{PrivateKey, PublicKey};
    /// # use rlwe_kex::ring::{PolyRing, Polynomial};
    /// let ring = PolyRing::try_with(2, 17).unwrap();
    /// let base = Polynomial::new(vec![3, 5]);
    /// let private_key = PrivateKey::new(Polynomial::new(vec![1, 0]));
    /// let public_key = PublicKey::derive(&ring, &base, &private_key, &ring.zero());
    /// assert_eq!(public_key.polynomial.coefficients(), &[3, 5]);
    /// ```
    pub fn derive(
        ring: &PolyRing,
        base: &Polynomial,
        private_key: &PrivateKey,
        error: &Polynomial,
    ) -> Self {
        let product = ring.multiply(base, &private_key.polynomial);
        Self::new(ring.add(&product, error))
    }

    /// Exports the public key as base64 of fixed-width little-endian coefficients.
    pub fn to_base64(&self, ring: &PolyRing) -> String {
        encode_polynomial(ring, &self.polynomial)
    }

    /// Imports a public key produced by [`PublicKey::to_base64`] under the same ring.
    pub fn from_base64(ring: &PolyRing, encoded: &str) -> Result<Self, RlweKexError> {
        Ok(Self::new(decode_polynomial(ring, encoded)?))
    }

    /// Exports the public key to a JSON string.
    pub fn to_json(&self) -> Result<String, RlweKexError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Imports a public key from a JSON string, checking it is a valid ring element.
    pub fn from_json(ring: &PolyRing, json_str: &str) -> Result<Self, RlweKexError> {
        let key: PublicKey = serde_json::from_str(json_str)?;
        let polynomial = ring.try_polynomial(key.polynomial.into_coefficients())?;
        Ok(Self::new(polynomial))
    }
}
