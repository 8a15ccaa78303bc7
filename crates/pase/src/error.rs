//! Errors that can occur while deriving secrets or running a pairing session.

use std::array::TryFromSliceError;

use thiserror::Error;

/// Result type returning [`Error`] or `T`
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the protocol core.
///
/// None of these are retried internally. A session that returns any of them
/// is finished and must be discarded.
#[derive(Error, Debug)]
pub enum Error {
    /// A peer-supplied value did not decode to a valid curve point.
    #[error("{what} is not on the curve")]
    InvalidPoint { what: &'static str },

    /// A key confirmation value did not match the locally computed one.
    #[error("received incorrect key confirmation from the {peer}")]
    ConfirmationMismatch { peer: &'static str },

    /// The peer refused our key confirmation.
    #[error("{peer} rejected the key confirmation")]
    Rejected { peer: &'static str },

    /// A step was invoked before its prerequisite completed.
    #[error("session is {found}, expected {expected}")]
    State {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid PBKDF parameters: {0}")]
    InvalidPbkdfParameters(&'static str),

    #[error("tried to extract an invalid number of bytes from a KDF")]
    InvalidKdfOutputLength,

    #[error("malformed verifier record")]
    InvalidVerifier,

    #[error("random source failure: {0}")]
    RngSourceErr(#[from] getrandom::Error),

    #[error("cryptographic err: {0}")]
    Crypto(String),

    #[error("background derivation failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn other<T: Into<Box<dyn std::error::Error + Send + Sync>>>(e: T) -> Self {
        Error::Other(e.into())
    }

    /// A peer value failed validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidPoint { .. })
    }

    /// Key confirmation failed: wrong passcode or an active attacker.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            Error::ConfirmationMismatch { .. } | Error::Rejected { .. }
        )
    }

    /// The caller drove a session out of order.
    pub fn is_state(&self) -> bool {
        matches!(self, Error::State { .. })
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e.into())
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.into())
    }
}

impl From<TryFromSliceError> for Error {
    fn from(e: TryFromSliceError) -> Self {
        Error::Other(Box::new(e))
    }
}

impl From<digest::InvalidLength> for Error {
    fn from(e: digest::InvalidLength) -> Self {
        Error::Crypto(e.to_string())
    }
}
