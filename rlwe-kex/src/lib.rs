//! Ring-LWE key exchange over Z_q[x] / (x^N + 1).
//!
//! Two parties generate key pairs over a shared uniform base, swap public
//! keys, multiply the peer's public key by their own private key and
//! reconcile the (approximately equal) result into identical bits.

pub mod codec;
pub mod errors;
pub mod keypair;
pub mod params;
pub mod preset;
pub mod reconcile;
pub mod ring;
pub mod sampler;

pub use errors::RlweKexError;
pub use keypair::{KeyGenerator, KeyPair, PrivateKey, PublicKey};
pub use params::{GaussianParams, Interval, KexParams, ReconciliationIntervals};
pub use reconcile::{Agreement, Reconciler, SharedKey};
pub use ring::{PolyRing, Polynomial, Ring};
