// Containers for key material that must not outlive the session.

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use std::fmt;
use std::ops::Deref;

/// A byte buffer that is zeroized on drop. `Debug` never prints the contents.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    pub fn from_slice(data: &[u8]) -> Self {
        Self(data.to_vec())
    }

    pub fn data(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for SecretBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for SecretBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for SecretBytes {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes([REDACTED; {}])", self.0.len())
    }
}

/// The session key `K = H(S)`.
///
/// Only trust it once the session has reached `Authenticated`; on any
/// failure drop it.
#[derive(Clone)]
pub struct SessionKey(SecretBytes);

impl SessionKey {
    pub(crate) fn new(key: SecretBytes) -> Self {
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.data()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for SessionKey {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(self.as_bytes(), other.as_bytes())
    }
}

impl Eq for SessionKey {}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionKey([REDACTED; {}])", self.0.len())
    }
}

/// Compares two byte strings without an early exit on the first differing
/// byte. Lengths are public and a length mismatch returns `false` directly.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn secret_bytes_debug_is_redacted() {
        let secret = SecretBytes::from_slice(b"hunter2");

        let debug = format!("{:?}", secret);

        assert_eq!(debug, "SecretBytes([REDACTED; 7])");
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn session_key_debug_is_redacted() {
        let key = SessionKey::new(SecretBytes::from(vec![0xab; 32]));

        assert_eq!(format!("{:?}", key), "SessionKey([REDACTED; 32])");
    }

    #[test]
    fn zeroize_clears_secret_bytes() {
        let mut secret = SecretBytes::from_slice(&[7u8; 16]);

        secret.zeroize();

        assert!(secret.is_empty());
    }

    #[rstest]
    #[case(b"", b"", true)]
    #[case(b"evidence", b"evidence", true)]
    #[case(b"evidence", b"evidencf", false)]
    #[case(b"evidence", b"evidenc", false)]
    #[case(b"", b"x", false)]
    fn constant_time_eq_compares_contents(
        #[case] a: &[u8],
        #[case] b: &[u8],
        #[case] expected: bool,
    ) {
        assert_eq!(constant_time_eq(a, b), expected);
    }

    #[test]
    fn session_keys_compare_by_value() {
        let key = SessionKey::new(SecretBytes::from_slice(&[1, 2, 3]));
        let same = SessionKey::new(SecretBytes::from_slice(&[1, 2, 3]));
        let different = SessionKey::new(SecretBytes::from_slice(&[1, 2, 4]));

        assert_eq!(key, same);
        assert_ne!(key, different);
    }
}
