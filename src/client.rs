// Client side of SRP-6a: registration and the authentication path.

use crate::codec::to_bytes_be;
use crate::messages::{ClientEvidence, ClientHello, ClientKeyExchange, ClientRegistration};
use crate::primitives::{
    client_premaster_secret, compute_m1, compute_m2, compute_session_key, compute_u,
    compute_verifier, compute_x, generate_modexp_keypair, generate_salt, reduce_public_value,
    ModExpKeyPair,
};
use crate::secret::constant_time_eq;
use crate::{GroupParams, Result, SecretBytes, SessionKey, SrpError};

use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    New,
    CredentialsSet,
    RegistrationDone,
    KeyExchanged,
    SessionKeyDerived,
    EvidenceSent,
    Authenticated,
    Aborted,
}

impl ClientState {
    pub fn name(&self) -> &'static str {
        match self {
            ClientState::New => "New",
            ClientState::CredentialsSet => "CredentialsSet",
            ClientState::RegistrationDone => "RegistrationDone",
            ClientState::KeyExchanged => "KeyExchanged",
            ClientState::SessionKeyDerived => "SessionKeyDerived",
            ClientState::EvidenceSent => "EvidenceSent",
            ClientState::Authenticated => "Authenticated",
            ClientState::Aborted => "Aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClientState::RegistrationDone | ClientState::Authenticated | ClientState::Aborted
        )
    }
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values fixed by `session_key` and needed for the evidence messages.
struct Derived {
    salt: Vec<u8>,
    b_pub: BigUint,
    key: SecretBytes,
    m1: Option<Vec<u8>>,
}

/// The credential owner's side of one registration or authentication.
///
/// Registration: `set_credentials` then `register`.
/// Authentication: `set_credentials`, `hello`, `key_exchange`,
/// `session_key`, `evidence_message`, `verify_evidence`.
///
/// Every call checks the current state first and fails with
/// `InvalidSessionState` if it is out of order. The password, `a` and `K`
/// are zeroized when the session reaches a terminal state or is dropped.
pub struct ClientSession<'p, R> {
    params: &'p GroupParams,
    rng: R,
    state: ClientState,
    identity: Vec<u8>,
    password: SecretBytes,
    keys: Option<ModExpKeyPair>,
    derived: Option<Derived>,
}

impl<'p> ClientSession<'p, OsRng> {
    pub fn with_os_rng(params: &'p GroupParams) -> Self {
        Self::new(params, OsRng)
    }
}

impl<'p, R: RngCore + CryptoRng> ClientSession<'p, R> {
    pub fn new(params: &'p GroupParams, rng: R) -> Self {
        Self {
            params,
            rng,
            state: ClientState::New,
            identity: Vec::new(),
            password: SecretBytes::default(),
            keys: None,
            derived: None,
        }
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn params(&self) -> &'p GroupParams {
        self.params
    }

    pub fn identity(&self) -> &[u8] {
        &self.identity
    }

    pub fn set_credentials(&mut self, identity: &[u8], password: &[u8]) -> Result<()> {
        self.expect_state("set_credentials", &[ClientState::New])?;
        self.identity = identity.to_vec();
        self.password = SecretBytes::from_slice(password);
        self.transition(ClientState::CredentialsSet);
        Ok(())
    }

    pub fn hello(&self) -> Result<ClientHello> {
        self.expect_state(
            "hello",
            &[ClientState::CredentialsSet, ClientState::KeyExchanged],
        )?;
        Ok(ClientHello {
            identity: self.identity.clone(),
        })
    }

    /// Generates a fresh salt and computes the verifier for the server to
    /// store. The password is wiped afterwards; the session is finished.
    pub fn register(&mut self) -> Result<ClientRegistration> {
        self.expect_state("register", &[ClientState::CredentialsSet])?;
        let salt = match generate_salt(&mut self.rng) {
            Ok(salt) => salt,
            Err(err) => return Err(self.abort(err)),
        };
        let hash = self.params.hash();
        let x = compute_x(&salt, &self.identity, &self.password, hash);
        let verifier = compute_verifier(self.params, &BigUint::from_bytes_be(&x));
        drop(x);

        self.wipe();
        self.transition(ClientState::RegistrationDone);
        Ok(ClientRegistration {
            identity: self.identity.clone(),
            salt,
            verifier: to_bytes_be(&verifier),
        })
    }

    /// Draws a new `a` and returns `A = g^a`. Calling it again before
    /// `session_key` replaces `a`; an exponent is never reused.
    pub fn key_exchange(&mut self) -> Result<ClientKeyExchange> {
        self.expect_state(
            "key_exchange",
            &[ClientState::CredentialsSet, ClientState::KeyExchanged],
        )?;
        let keys = match generate_modexp_keypair(self.params, &mut self.rng) {
            Ok(keys) => keys,
            Err(err) => return Err(self.abort(err)),
        };
        let a_pub = to_bytes_be(&keys.pub_key);
        self.keys = Some(keys);
        self.transition(ClientState::KeyExchanged);
        Ok(ClientKeyExchange { a_pub })
    }

    /// Derives `K` from the server's `B` and the user's salt.
    ///
    /// Aborts the session if `B % N == 0` or `u == 0`. Calling it again with
    /// the same inputs returns the same key; different inputs are rejected,
    /// since `a` is bound to the first `B`.
    pub fn session_key(&mut self, b_pub: &[u8], salt: &[u8]) -> Result<SessionKey> {
        self.expect_state(
            "session_key",
            &[ClientState::KeyExchanged, ClientState::SessionKeyDerived],
        )?;
        if self.state == ClientState::SessionKeyDerived {
            return self.repeated_session_key(b_pub, salt);
        }
        let derived = match self.derive(b_pub, salt) {
            Ok(derived) => derived,
            Err(err) => return Err(self.abort(err)),
        };
        let key = SessionKey::new(derived.key.clone());
        self.derived = Some(derived);
        self.transition(ClientState::SessionKeyDerived);
        Ok(key)
    }

    fn repeated_session_key(&self, b_pub: &[u8], salt: &[u8]) -> Result<SessionKey> {
        let b_pub = BigUint::from_bytes_be(b_pub) % self.params.n();
        match &self.derived {
            Some(derived) if derived.b_pub == b_pub && derived.salt == salt => {
                Ok(SessionKey::new(derived.key.clone()))
            }
            _ => Err(self.state_error("session_key")),
        }
    }

    fn derive(&self, b_pub: &[u8], salt: &[u8]) -> Result<Derived> {
        let params = self.params;
        let keys = self.keys.as_ref().ok_or_else(|| self.state_error("session_key"))?;
        let b_pub = reduce_public_value(params, b_pub)?;
        let u = compute_u(params, &keys.pub_key, &b_pub)?;
        let x = compute_x(salt, &self.identity, &self.password, params.hash());
        let premaster = client_premaster_secret(
            params,
            &b_pub,
            &BigUint::from_bytes_be(&x),
            &keys.private_exponent(),
            &u,
        );
        let key = compute_session_key(params.hash(), &premaster);
        Ok(Derived {
            salt: salt.to_vec(),
            b_pub,
            key,
            m1: None,
        })
    }

    /// `M1`, the proof that this side derived `K`.
    pub fn evidence_message(&mut self) -> Result<ClientEvidence> {
        self.expect_state(
            "evidence_message",
            &[ClientState::SessionKeyDerived, ClientState::EvidenceSent],
        )?;
        let m1 = match (&self.keys, &self.derived) {
            (Some(keys), Some(derived)) => compute_m1(
                self.params,
                &self.identity,
                &derived.salt,
                &keys.pub_key,
                &derived.b_pub,
                &derived.key,
            ),
            _ => Err(self.state_error("evidence_message")),
        };
        let m1 = match m1 {
            Ok(m1) => m1,
            Err(err) => return Err(self.abort(err)),
        };
        if let Some(derived) = self.derived.as_mut() {
            derived.m1 = Some(m1.clone());
        }
        self.transition(ClientState::EvidenceSent);
        Ok(ClientEvidence { m1 })
    }

    /// Checks the server's `M2`. On success the server is authenticated and
    /// the key returned by `session_key` may be used; on failure the session
    /// aborts and that key must be discarded.
    pub fn verify_evidence(&mut self, m2: &[u8]) -> Result<()> {
        self.expect_state("verify_evidence", &[ClientState::EvidenceSent])?;
        let expected = match (&self.keys, &self.derived) {
            (Some(keys), Some(Derived { m1: Some(m1), key, .. })) => {
                Some(compute_m2(self.params, &keys.pub_key, m1, key))
            }
            _ => None,
        };
        let Some(expected) = expected else {
            return Err(self.state_error("verify_evidence"));
        };
        if !constant_time_eq(&expected, m2) {
            return Err(self.abort(SrpError::EvidenceMismatch));
        }
        self.wipe();
        self.transition(ClientState::Authenticated);
        Ok(())
    }

    fn expect_state(&self, operation: &'static str, allowed: &[ClientState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(self.state_error(operation))
        }
    }

    fn state_error(&self, operation: &'static str) -> SrpError {
        SrpError::InvalidSessionState {
            operation,
            state: self.state.name(),
        }
    }

    fn transition(&mut self, next: ClientState) {
        log::debug!(
            "srp client ({}-byte identity): {} -> {}",
            self.identity.len(),
            self.state,
            next
        );
        self.state = next;
    }

    fn abort(&mut self, err: SrpError) -> SrpError {
        log::warn!("srp client aborted in state {}: {}", self.state, err);
        self.wipe();
        self.state = ClientState::Aborted;
        err
    }

    /// Drops every secret the session holds. `SecretBytes` zeroizes on drop.
    fn wipe(&mut self) {
        self.password = SecretBytes::default();
        self.keys = None;
        self.derived = None;
    }
}
