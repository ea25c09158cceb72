// Server side of SRP-6a: verifier lookup, key derivation and evidence checks.

use crate::codec::to_bytes_be;
use crate::messages::{ServerEvidence, ServerHello, StandardServerHello};
use crate::primitives::{
    compute_b_pub, compute_m1, compute_m2, compute_session_key, compute_u,
    generate_modexp_keypair, reduce_public_value, server_premaster_secret, ModExpKeyPair,
};
use crate::secret::constant_time_eq;
use crate::store::CredentialStore;
use crate::{GroupParams, Result, SecretBytes, SessionKey, SrpError};

use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    New,
    CredentialsSet,
    KeyExchanged,
    SessionKeyDerived,
    EvidenceVerified,
    Authenticated,
    Aborted,
}

impl ServerState {
    pub fn name(&self) -> &'static str {
        match self {
            ServerState::New => "New",
            ServerState::CredentialsSet => "CredentialsSet",
            ServerState::KeyExchanged => "KeyExchanged",
            ServerState::SessionKeyDerived => "SessionKeyDerived",
            ServerState::EvidenceVerified => "EvidenceVerified",
            ServerState::Authenticated => "Authenticated",
            ServerState::Aborted => "Aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ServerState::Authenticated | ServerState::Aborted)
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct UserRecord {
    identity: Vec<u8>,
    salt: Vec<u8>,
    verifier: BigUint,
}

struct Ephemeral {
    keys: ModExpKeyPair,
    b_pub: BigUint,
}

struct Derived {
    a_pub: BigUint,
    key: SecretBytes,
    expected_m1: Vec<u8>,
}

/// The verifier's side of one authentication attempt.
///
/// `set_credentials` (or `from_store`), `hello`, `session_key`,
/// `verify_evidence`, `evidence_message`. Out-of-order calls fail with
/// `InvalidSessionState`; `b` and `K` are zeroized on reaching a terminal
/// state or on drop.
pub struct ServerSession<'p, R> {
    params: &'p GroupParams,
    rng: R,
    state: ServerState,
    user: Option<UserRecord>,
    ephemeral: Option<Ephemeral>,
    derived: Option<Derived>,
    m1: Option<Vec<u8>>,
}

impl<'p> ServerSession<'p, OsRng> {
    pub fn with_os_rng(params: &'p GroupParams) -> Self {
        Self::new(params, OsRng)
    }
}

impl<'p, R: RngCore + CryptoRng> ServerSession<'p, R> {
    pub fn new(params: &'p GroupParams, rng: R) -> Self {
        Self {
            params,
            rng,
            state: ServerState::New,
            user: None,
            ephemeral: None,
            derived: None,
            m1: None,
        }
    }

    /// A session for `identity` with credentials from `store`. Unknown
    /// identities get simulated credentials and will fail `verify_evidence`.
    pub fn from_store<S: CredentialStore + ?Sized>(
        params: &'p GroupParams,
        store: &S,
        identity: &[u8],
        rng: R,
    ) -> Result<Self> {
        let credentials = store.lookup_or_simulate(params, identity);
        let mut session = Self::new(params, rng);
        session.set_credentials(identity, &credentials.salt, &credentials.verifier)?;
        Ok(session)
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn params(&self) -> &'p GroupParams {
        self.params
    }

    pub fn set_credentials(
        &mut self,
        identity: &[u8],
        salt: &[u8],
        verifier: &[u8],
    ) -> Result<()> {
        self.expect_state("set_credentials", &[ServerState::New])?;
        self.user = Some(UserRecord {
            identity: identity.to_vec(),
            salt: salt.to_vec(),
            verifier: BigUint::from_bytes_be(verifier),
        });
        self.transition(ServerState::CredentialsSet);
        Ok(())
    }

    /// Draws `b` and returns the user's salt with `B = k*v + g^b`.
    pub fn hello(&mut self) -> Result<ServerHello> {
        self.expect_state("hello", &[ServerState::CredentialsSet])?;
        let (salt, verifier) = match &self.user {
            Some(user) => (user.salt.clone(), user.verifier.clone()),
            None => return Err(self.state_error("hello")),
        };
        let keys = match generate_modexp_keypair(self.params, &mut self.rng) {
            Ok(keys) => keys,
            Err(err) => return Err(self.abort(err)),
        };
        let b_pub = compute_b_pub(self.params, &keys.private_exponent(), &verifier);
        let hello = ServerHello {
            salt,
            b_pub: to_bytes_be(&b_pub),
        };
        self.ephemeral = Some(Ephemeral { keys, b_pub });
        self.transition(ServerState::KeyExchanged);
        Ok(hello)
    }

    /// `hello` with the group announced alongside, for clients that do not
    /// know `N`, `g` and `H` in advance.
    pub fn standard_hello(&mut self) -> Result<StandardServerHello> {
        let hello = self.hello()?;
        Ok(StandardServerHello::new(self.params, hello))
    }

    /// Derives `K` from the client's `A`. Aborts if `A % N == 0` or `u == 0`.
    ///
    /// A repeat with the same `A` returns the same key; any other `A` is
    /// rejected, since `b` is bound to the first one.
    pub fn session_key(&mut self, a_pub: &[u8]) -> Result<SessionKey> {
        self.expect_state(
            "session_key",
            &[ServerState::KeyExchanged, ServerState::SessionKeyDerived],
        )?;
        if self.state == ServerState::SessionKeyDerived {
            return self.repeated_session_key(a_pub);
        }
        let derived = match self.derive(a_pub) {
            Ok(derived) => derived,
            Err(err) => return Err(self.abort(err)),
        };
        let key = SessionKey::new(derived.key.clone());
        self.derived = Some(derived);
        self.transition(ServerState::SessionKeyDerived);
        Ok(key)
    }

    fn repeated_session_key(&self, a_pub: &[u8]) -> Result<SessionKey> {
        let a_pub = BigUint::from_bytes_be(a_pub) % self.params.n();
        match &self.derived {
            Some(derived) if derived.a_pub == a_pub => Ok(SessionKey::new(derived.key.clone())),
            _ => Err(self.state_error("session_key")),
        }
    }

    fn derive(&self, a_pub: &[u8]) -> Result<Derived> {
        let params = self.params;
        let (user, ephemeral) = match (&self.user, &self.ephemeral) {
            (Some(user), Some(ephemeral)) => (user, ephemeral),
            _ => return Err(self.state_error("session_key")),
        };
        let a_pub = reduce_public_value(params, a_pub)?;
        let u = compute_u(params, &a_pub, &ephemeral.b_pub)?;
        let premaster = server_premaster_secret(
            params,
            &a_pub,
            &user.verifier,
            &u,
            &ephemeral.keys.private_exponent(),
        );
        let key = compute_session_key(params.hash(), &premaster);
        let expected_m1 = compute_m1(
            params,
            &user.identity,
            &user.salt,
            &a_pub,
            &ephemeral.b_pub,
            &key,
        )?;
        Ok(Derived {
            a_pub,
            key,
            expected_m1,
        })
    }

    /// Checks the client's `M1`. A mismatch aborts the session with
    /// `EvidenceMismatch` whatever the cause: wrong password, unknown
    /// identity or a tampered message.
    pub fn verify_evidence(&mut self, m1: &[u8]) -> Result<()> {
        self.expect_state("verify_evidence", &[ServerState::SessionKeyDerived])?;
        let matches = match &self.derived {
            Some(derived) => constant_time_eq(&derived.expected_m1, m1),
            None => return Err(self.state_error("verify_evidence")),
        };
        if !matches {
            return Err(self.abort(SrpError::EvidenceMismatch));
        }
        self.m1 = Some(m1.to_vec());
        self.transition(ServerState::EvidenceVerified);
        Ok(())
    }

    /// `M2`, only available once the client has proven itself.
    pub fn evidence_message(&mut self) -> Result<ServerEvidence> {
        self.expect_state("evidence_message", &[ServerState::EvidenceVerified])?;
        let m2 = match (&self.derived, &self.m1) {
            (Some(derived), Some(m1)) => {
                compute_m2(self.params, &derived.a_pub, m1, &derived.key)
            }
            _ => return Err(self.state_error("evidence_message")),
        };
        self.wipe();
        self.transition(ServerState::Authenticated);
        Ok(ServerEvidence { m2 })
    }

    fn expect_state(&self, operation: &'static str, allowed: &[ServerState]) -> Result<()> {
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

    fn transition(&mut self, next: ServerState) {
        log::debug!("srp server: {} -> {}", self.state, next);
        self.state = next;
    }

    fn abort(&mut self, err: SrpError) -> SrpError {
        log::warn!("srp server aborted in state {}: {}", self.state, err);
        self.wipe();
        self.state = ServerState::Aborted;
        err
    }

    fn wipe(&mut self) {
        self.ephemeral = None;
        self.derived = None;
        self.m1 = None;
    }
}
