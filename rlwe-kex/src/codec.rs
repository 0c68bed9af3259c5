//! Transport encoding for ring elements.
//!
//! A polynomial is written as `N` fixed-width little-endian coefficients,
//! the width being the number of bytes needed for `q - 1`, then base64
//! encoded. Decoding checks the length and that every coefficient is below `q`,
//! so a decoded value is always a valid, dense ring element.

use crate::errors::RlweKexError;
use crate::ring::{PolyRing, Polynomial, Vector};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const U64_SIZE_BYTES: usize = std::mem::size_of::<u64>();

/// Bytes per encoded coefficient for the ring's modulus.
///
/// # Example
///
/// ```
/// # use rlwe_kex::codec::coefficient_width;
/// # use rlwe_kex::ring::PolyRing;
/// assert_eq!(coefficient_width(&PolyRing::try_with(4, 17).unwrap()), 1);
/// assert_eq!(coefficient_width(&PolyRing::try_with(4, 257).unwrap()), 2);
/// assert_eq!(coefficient_width(&PolyRing::try_with(4, 4_294_967_295).unwrap()), 4);
/// ```
pub fn coefficient_width(ring: &PolyRing) -> usize {
    let max = ring.modulus() - 1;
    let bits = (u64::BITS - max.leading_zeros()) as usize;
    bits.div_ceil(8).max(1)
}

/// Encodes `p` (ring-reduced first) as a base64 string.
pub fn encode_polynomial(ring: &PolyRing, p: &Polynomial) -> String {
    let width = coefficient_width(ring);
    let reduced = ring.ring_reduce(p);

    let mut bytes = Vec::with_capacity(reduced.len() * width);
    for &c in reduced.coefficients() {
        bytes.extend_from_slice(&(c as u64).to_le_bytes()[..width]);
    }

    STANDARD.encode(bytes)
}

/// Decodes a string produced by [`encode_polynomial`] under the same ring.
///
/// # Errors
///
/// Returns `RlweKexError::DecodingError` on invalid base64, a byte length that
/// is not exactly `N * width`, or a coefficient `>= q`.
pub fn decode_polynomial(ring: &PolyRing, encoded: &str) -> Result<Polynomial, RlweKexError> {
    let width = coefficient_width(ring);
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| RlweKexError::DecodingError(format!("Base64 decoding failed: {}", e)))?;

    let expected = ring.dimension() * width;
    if bytes.len() != expected {
        return Err(RlweKexError::DecodingError(format!(
            "Expected {} bytes for {} coefficients, got {}",
            expected,
            ring.dimension(),
            bytes.len()
        )));
    }

    let modulus = ring.modulus();
    let coefficients = bytes
        .chunks_exact(width)
        .enumerate()
        .map(|(degree, chunk)| {
            let mut buffer = [0u8; U64_SIZE_BYTES];
            buffer[..width].copy_from_slice(chunk);
            let value = u64::from_le_bytes(buffer);
            if value >= modulus {
                return Err(RlweKexError::DecodingError(format!(
                    "Coefficient {} at degree {} is not below modulus {}",
                    value, degree, modulus
                )));
            }
            Ok(value as i64)
        })
        .collect::<Result<Vector, RlweKexError>>()?;

    Ok(Polynomial::new(coefficients))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encoding() -> Result<(), RlweKexError> {
        let ring = PolyRing::try_with(4, 17)?;
        let p = Polynomial::new(vec![1, 2, 3, 16]);
        let encoded = encode_polynomial(&ring, &p);
        assert_eq!(encoded, STANDARD.encode([1u8, 2, 3, 16]));
        assert_eq!(decode_polynomial(&ring, &encoded)?, p);
        Ok(())
    }

    #[test]
    fn test_reference_width_preserves_extremes() -> Result<(), RlweKexError> {
        let ring = PolyRing::try_with(4, 4_294_967_295)?;
        let p = Polynomial::new(vec![0, 1, 4_294_967_294, 2_147_483_648]);
        let decoded = decode_polynomial(&ring, &encode_polynomial(&ring, &p))?;
        assert_eq!(decoded, p);
        Ok(())
    }

    #[test]
    fn test_encoding_reduces_first() -> Result<(), RlweKexError> {
        let ring = PolyRing::try_with(2, 17)?;
        let raw = Polynomial::new(vec![-1]);
        assert_eq!(decode_polynomial(&ring, &encode_polynomial(&ring, &raw))?.coefficients(), &[16, 0]);
        Ok(())
    }

    #[test]
    fn test_rejects_malformed_input() -> Result<(), RlweKexError> {
        let ring = PolyRing::try_with(4, 17)?;
        assert!(matches!(
            decode_polynomial(&ring, "not base64!"),
            Err(RlweKexError::DecodingError(_))
        ));
        assert!(matches!(
            decode_polynomial(&ring, &STANDARD.encode([1u8, 2, 3])),
            Err(RlweKexError::DecodingError(_))
        ));
        assert!(matches!(
            decode_polynomial(&ring, &STANDARD.encode([1u8, 2, 3, 17])),
            Err(RlweKexError::DecodingError(_))
        ));
        Ok(())
    }
}
