//! # Ring Module
//!
//! Provides [`Ring`] for coefficient arithmetic in Z_q and [`PolyRing`] for
//! arithmetic in the quotient ring Z_q[x] / (x^N + 1).

pub mod helper;
pub mod math;
pub mod poly;

/// Raw coefficient storage, index = degree.
pub type Vector = Vec<i64>;

pub use math::Ring;
pub use poly::{PolyRing, Polynomial};
