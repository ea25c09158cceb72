// Integer <-> byte conversions and hash-input assembly.
//
// Integers travel as big-endian, minimal-length byte strings. The only
// widening is PAD, which callers reach through `GroupParams::pad`.

use crate::{Result, SecretBytes, SrpError};

use num_bigint::BigUint;
use num_traits::Num;

pub fn to_bytes_be(x: &BigUint) -> Vec<u8> {
    x.to_bytes_be()
}

pub fn from_bytes_be(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Number of bytes in the minimal big-endian encoding of `x` (zero has none).
pub fn byte_len(x: &BigUint) -> usize {
    ((x.bits() + 7) / 8) as usize
}

/// Left-pads the big-endian bytes of `x` with zeros to exactly `len` bytes.
///
/// `x` must fit in `len` bytes.
pub(crate) fn pad_to(x: &BigUint, len: usize) -> Vec<u8> {
    let bytes = x.to_bytes_be();
    let value_len = byte_len(x);
    debug_assert!(value_len <= len, "value does not fit in padded width");
    let mut padded = vec![0u8; len.saturating_sub(value_len)];
    padded.extend_from_slice(&bytes[bytes.len() - value_len..]);
    padded
}

/// Parses a hexadecimal integer, ignoring whitespace and an optional `0x`.
pub fn parse_hex(hex: &str) -> Result<BigUint> {
    let digits: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(&digits);
    if digits.is_empty() {
        return Err(SrpError::MalformedInteger);
    }
    BigUint::from_str_radix(digits, 16).map_err(|_| SrpError::MalformedInteger)
}

/// `I | ":" | P`, the input to the inner hash of `x`.
pub fn identity_password(identity: &[u8], password: &[u8]) -> SecretBytes {
    let mut joined = Vec::with_capacity(identity.len() + 1 + password.len());
    joined.extend_from_slice(identity);
    joined.push(b':');
    joined.extend_from_slice(password);
    SecretBytes::from(joined)
}
