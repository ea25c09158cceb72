// Relays messages between a client and a server in the same process, in the
// order a transport would deliver them.

use crate::store::CredentialStore;
use crate::{ClientSession, Result, ServerSession, SessionKey};

use rand::{CryptoRng, RngCore};

/// Both sides' view of `K` after a successful authentication.
#[derive(Debug)]
pub struct SessionKeys {
    pub client: SessionKey,
    pub server: SessionKey,
}

/// Client Registration: the client computes `(s, v)` and the server stores it.
pub fn register<R, S>(client: &mut ClientSession<'_, R>, store: &mut S) -> Result<()>
where
    R: RngCore + CryptoRng,
    S: CredentialStore + ?Sized,
{
    let registration = client.register()?;
    store.store(
        &registration.identity,
        &registration.salt,
        &registration.verifier,
    );
    Ok(())
}

/// Runs the authentication path between two sessions. `server` must already
/// hold the credentials for the client's identity.
pub fn authenticate<RC, RS>(
    client: &mut ClientSession<'_, RC>,
    server: &mut ServerSession<'_, RS>,
) -> Result<SessionKeys>
where
    RC: RngCore + CryptoRng,
    RS: RngCore + CryptoRng,
{
    // Client Key Exchange and Server Hello.
    let key_exchange = client.key_exchange()?;
    let hello = server.hello()?;

    // Both sides derive K.
    let client_key = client.session_key(&hello.b_pub, &hello.salt)?;
    let server_key = server.session_key(&key_exchange.a_pub)?;

    // The client proves itself first, then the server.
    let client_evidence = client.evidence_message()?;
    server.verify_evidence(&client_evidence.m1)?;
    let server_evidence = server.evidence_message()?;
    client.verify_evidence(&server_evidence.m2)?;

    Ok(SessionKeys {
        client: client_key,
        server: server_key,
    })
}

/// Client Hello, then a server session built from `store` for that identity,
/// then `authenticate`.
pub fn authenticate_with_store<RC, RS, S>(
    client: &mut ClientSession<'_, RC>,
    store: &S,
    server_rng: RS,
) -> Result<SessionKeys>
where
    RC: RngCore + CryptoRng,
    RS: RngCore + CryptoRng,
    S: CredentialStore + ?Sized,
{
    let hello = client.hello()?;
    let mut server =
        ServerSession::from_store(client.params(), store, &hello.identity, server_rng)?;
    authenticate(client, &mut server)
}
