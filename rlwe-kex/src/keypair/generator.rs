use crate::keypair::keys::{KeyPair, PrivateKey, PublicKey};
use crate::params::{GaussianParams, KexParams};
use crate::ring::{PolyRing, Polynomial};
use crate::sampler::Sampler;

use rand::Rng;

use tracing::debug;

/// Generates bases and key pairs for one party.
///
/// Owns its [`Sampler`], so the randomness source is never shared between parties.
#[derive(Debug, Clone)]
pub struct KeyGenerator<R: Rng> {
    ring: PolyRing,
    private_key_noise: GaussianParams,
    error_noise: GaussianParams,
    sampler: Sampler<R>,
}

impl<R: Rng> KeyGenerator<R> {
    pub fn new(params: &KexParams, rng: R) -> Self {
        Self {
            ring: params.ring(),
            private_key_noise: *params.private_key_noise(),
            error_noise: *params.error_noise(),
            sampler: Sampler::new(params, rng),
        }
    }

    pub fn ring(&self) -> &PolyRing {
        &self.ring
    }

    /// Uniform base polynomial both parties generate their keys over.
    pub fn generate_base(&mut self) -> Polynomial {
        self.sampler.uniform_base()
    }

    pub fn generate_private_key(&mut self) -> PrivateKey {
        PrivateKey::new(self.sampler.discrete_gaussian(&self.private_key_noise))
    }

    /// `base * private_key + e` with a fresh Gaussian error `e`.
    pub fn generate_public_key(&mut self, base: &Polynomial, private_key: &PrivateKey) -> PublicKey {
        let error = self.sampler.discrete_gaussian(&self.error_noise);
        PublicKey::derive(&self.ring, base, private_key, &error)
    }

    pub fn generate_key_pair(&mut self, base: &Polynomial) -> KeyPair {
        let private_key = self.generate_private_key();
        let public_key = self.generate_public_key(base, &private_key);
        debug!(
            dimension = self.ring.dimension(),
            modulus = self.ring.modulus(),
            "generated key pair"
        );

        KeyPair {
            private_key,
            public_key,
        }
    }
}
