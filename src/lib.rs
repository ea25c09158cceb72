//! SRP-6a password-authenticated key exchange (RFC 5054, RFC 2945).
//!
//! A client and a server derive the same session key from the client's
//! password without the password, or anything an eavesdropper could run a
//! dictionary attack against, crossing the wire. The server keeps only a
//! salt and a verifier per identity.
//!
//! ```no_run
//! use srp6a::{exchange, ClientSession, GroupParams, InMemoryCredentialStore};
//!
//! # fn main() -> srp6a::Result<()> {
//! let params = GroupParams::recommended();
//! let mut store = InMemoryCredentialStore::with_os_rng()?;
//!
//! let mut registration = ClientSession::with_os_rng(&params);
//! registration.set_credentials(b"alice", b"correct horse")?;
//! exchange::register(&mut registration, &mut store)?;
//!
//! let mut client = ClientSession::with_os_rng(&params);
//! client.set_credentials(b"alice", b"correct horse")?;
//! let keys = exchange::authenticate_with_store(&mut client, &store, rand::rngs::OsRng)?;
//! assert_eq!(keys.client, keys.server);
//! # Ok(())
//! # }
//! ```

mod client;
mod codec;
mod error;
pub mod exchange;
mod groups;
mod hash;
pub mod messages;
mod prime;
pub mod primitives;
mod secret;
mod server;
mod store;

pub use client::{ClientSession, ClientState};
pub use codec::{byte_len, from_bytes_be, parse_hex, to_bytes_be};
pub use error::{AbortReason, Result, SrpError};
pub use groups::{
    GroupParams, StandardGroup, MIN_MODULUS_BITS, RECOMMENDED_GROUP_BITS, RECOMMENDED_HASH,
};
pub use hash::{HashAlgorithm, Hasher};
pub use messages::{
    ClientEvidence, ClientHello, ClientKeyExchange, ClientRegistration, ServerEvidence,
    ServerHello, StandardServerHello,
};
pub use prime::{is_likely_prime, MILLER_RABIN_ROUNDS};
pub use secret::{constant_time_eq, SecretBytes, SessionKey};
pub use server::{ServerSession, ServerState};
pub use store::{simulate_credentials, CredentialStore, Credentials, InMemoryCredentialStore};
