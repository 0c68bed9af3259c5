//! # Key Pair Module
//!
//! Key types and the [`KeyGenerator`] producing them over a shared base.

pub mod generator;
pub mod keys;

pub use generator::KeyGenerator;
pub use keys::{KeyPair, PrivateKey, PublicKey};
