// Server-side verifier storage.

use crate::codec::to_bytes_be;
use crate::primitives::{compute_verifier, generate_private_exponent, SALT_BYTES};
use crate::{GroupParams, Result, SecretBytes, SrpError};

use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use std::collections::HashMap;

/// What the server keeps per identity. Never the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub salt: Vec<u8>,
    pub verifier: Vec<u8>,
}

pub trait CredentialStore {
    fn lookup(&self, identity: &[u8]) -> Option<Credentials>;

    fn store(&mut self, identity: &[u8], salt: &[u8], verifier: &[u8]);

    /// Key for the credentials handed out for unknown identities.
    fn simulation_secret(&self) -> &[u8];

    /// Stored credentials, or a stable fake `(s, v)` for an unknown identity
    /// so that it fails the same way a wrong password does.
    fn lookup_or_simulate(&self, params: &GroupParams, identity: &[u8]) -> Credentials {
        self.lookup(identity).unwrap_or_else(|| {
            log::debug!(
                "no credentials for {}-byte identity, simulating",
                identity.len()
            );
            simulate_credentials(params, self.simulation_secret(), identity)
        })
    }
}

/// `s = H(secret | "salt" | I)` truncated to `SALT_BYTES` and
/// `v = g^H(secret | "verifier" | I)`.
pub fn simulate_credentials(params: &GroupParams, secret: &[u8], identity: &[u8]) -> Credentials {
    let hash = params.hash();
    let mut salt = hash.digest_parts(&[secret, b"salt", identity]);
    salt.truncate(SALT_BYTES);
    let x = SecretBytes::from(hash.digest_parts(&[secret, b"verifier", identity]));
    let verifier = compute_verifier(params, &BigUint::from_bytes_be(&x));
    Credentials {
        salt,
        verifier: to_bytes_be(&verifier),
    }
}

#[derive(Debug)]
pub struct InMemoryCredentialStore {
    credentials: HashMap<Vec<u8>, Credentials>,
    simulation_secret: SecretBytes,
}

impl InMemoryCredentialStore {
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self> {
        Ok(Self {
            credentials: HashMap::default(),
            simulation_secret: generate_private_exponent(rng)?,
        })
    }

    pub fn with_os_rng() -> Result<Self> {
        Self::new(&mut OsRng)
    }

    pub fn contains(&self, identity: &[u8]) -> bool {
        self.credentials.contains_key(identity)
    }

    pub fn remove(&mut self, identity: &[u8]) -> Result<Credentials> {
        self.credentials
            .remove(identity)
            .ok_or(SrpError::UnknownIdentity)
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn lookup(&self, identity: &[u8]) -> Option<Credentials> {
        self.credentials.get(identity).cloned()
    }

    fn store(&mut self, identity: &[u8], salt: &[u8], verifier: &[u8]) {
        self.credentials.insert(
            identity.to_vec(),
            Credentials {
                salt: salt.to_vec(),
                verifier: verifier.to_vec(),
            },
        );
    }

    fn simulation_secret(&self) -> &[u8] {
        &self.simulation_secret
    }
}
