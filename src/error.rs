use thiserror::Error;

/// Why a session aborted mid-protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The peer's public value `A` or `B` was congruent to zero mod `N`.
    ZeroPublicValue,
    /// The scrambling parameter `u = H(PAD(A) | PAD(B))` was zero.
    ZeroScramblingParameter,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::ZeroPublicValue => write!(f, "public value is zero mod N"),
            AbortReason::ZeroScramblingParameter => write!(f, "scrambling parameter u is zero"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SrpError {
    #[error("no standard group with a {0}-bit modulus")]
    UnsupportedGroupSize(u32),
    #[error("weak group parameters: {0}")]
    WeakGroupParameters(&'static str),
    #[error("integer is not valid hexadecimal")]
    MalformedInteger,
    #[error("unknown hash algorithm '{0}'")]
    UnknownHashAlgorithm(String),
    #[error("protocol aborted: {0}")]
    ProtocolAbort(AbortReason),
    /// Evidence did not match. Deliberately carries no detail about which
    /// input was wrong.
    #[error("evidence message did not match")]
    EvidenceMismatch,
    #[error("secure random source unavailable")]
    RandomSourceFailure,
    #[error("cannot call {operation} in state {state}")]
    InvalidSessionState {
        operation: &'static str,
        state: &'static str,
    },
    #[error("digest outputs have different lengths")]
    DigestLengthMismatch,
    #[error("no credentials stored for identity")]
    UnknownIdentity,
}

impl SrpError {
    /// Aborts and evidence mismatches end the session; the attempt has failed
    /// and no derived key may be used.
    pub fn is_protocol_abort(&self) -> bool {
        matches!(
            self,
            SrpError::ProtocolAbort(_) | SrpError::EvidenceMismatch
        )
    }

    /// Infrastructure failures the caller may retry with a fresh session.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SrpError::RandomSourceFailure)
    }
}

pub type Result<T> = std::result::Result<T, SrpError>;
