// The values a transport relays between client and server.
//
// Integers are carried as big-endian, minimal-length byte strings. How these
// structs are framed on the wire is up to the caller.

use crate::codec::to_bytes_be;
use crate::{GroupParams, HashAlgorithm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHello {
    pub identity: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHello {
    pub salt: Vec<u8>,
    pub b_pub: Vec<u8>,
}

/// Server Hello for peers that learn the group from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardServerHello {
    pub n: Vec<u8>,
    pub g: Vec<u8>,
    pub hash: HashAlgorithm,
    pub salt: Vec<u8>,
    pub b_pub: Vec<u8>,
}

impl StandardServerHello {
    pub(crate) fn new(params: &GroupParams, hello: ServerHello) -> Self {
        Self {
            n: to_bytes_be(params.n()),
            g: to_bytes_be(params.g()),
            hash: params.hash(),
            salt: hello.salt,
            b_pub: hello.b_pub,
        }
    }

    /// Validates the announced group and returns it with the simplified hello.
    pub fn into_parts(self) -> crate::Result<(GroupParams, ServerHello)> {
        let params = GroupParams::from_server_hello(&self.n, &self.g, self.hash)?;
        let hello = ServerHello {
            salt: self.salt,
            b_pub: self.b_pub,
        };
        Ok((params, hello))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRegistration {
    pub identity: Vec<u8>,
    pub salt: Vec<u8>,
    pub verifier: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKeyExchange {
    pub a_pub: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEvidence {
    pub m1: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEvidence {
    pub m2: Vec<u8>,
}
