// Selectable one-way hash function used for k, x, u, K, M1 and M2.

use crate::{Result, SrpError};

use digest::DynDigest;

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// The algorithm RFC 5054 mandates. Kept for interoperability and for
    /// the published test vectors.
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 6] = [
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Sha3_512,
    ];

    pub fn hasher(&self) -> Hasher {
        let inner: Box<dyn DynDigest> = match self {
            HashAlgorithm::Sha1 => Box::<sha1::Sha1>::default(),
            HashAlgorithm::Sha256 => Box::<sha2::Sha256>::default(),
            HashAlgorithm::Sha384 => Box::<sha2::Sha384>::default(),
            HashAlgorithm::Sha512 => Box::<sha2::Sha512>::default(),
            HashAlgorithm::Sha3_256 => Box::<sha3::Sha3_256>::default(),
            HashAlgorithm::Sha3_512 => Box::<sha3::Sha3_512>::default(),
        };
        Hasher { inner }
    }

    pub fn output_len(&self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 | HashAlgorithm::Sha3_256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 | HashAlgorithm::Sha3_512 => 64,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Sha3_256 => "sha3-256",
            HashAlgorithm::Sha3_512 => "sha3-512",
        }
    }

    pub fn digest_message(&self, message: &[u8]) -> Vec<u8> {
        self.hasher().update_and_digest(message)
    }

    /// Hashes the concatenation of `parts` without building it in memory.
    pub fn digest_parts(&self, parts: &[&[u8]]) -> Vec<u8> {
        let mut hasher = self.hasher();
        for part in parts {
            hasher.update(part);
        }
        hasher.digest()
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = SrpError;

    fn from_str(s: &str) -> Result<Self> {
        let normalised = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        match normalised.as_str() {
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            "sha3256" => Ok(HashAlgorithm::Sha3_256),
            "sha3512" => Ok(HashAlgorithm::Sha3_512),
            _ => Err(SrpError::UnknownHashAlgorithm(s.to_string())),
        }
    }
}

/// Incremental digest state for one `HashAlgorithm`.
pub struct Hasher {
    inner: Box<dyn DynDigest>,
}

impl Hasher {
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    pub fn digest(mut self) -> Vec<u8> {
        self.inner.finalize_reset().into_vec()
    }

    pub fn update_and_digest(mut self, message: &[u8]) -> Vec<u8> {
        self.update(message);
        self.digest()
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn output_len(&self) -> usize {
        self.inner.output_size()
    }
}
