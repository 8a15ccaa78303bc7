//! Logical PASE handshake messages.
//!
//! These are passed between the client and server as values; no byte-level
//! wire encoding is defined for them.

use std::fmt;

use crate::{
    common::colorize,
    constants::{DEFAULT_PASSCODE_ID, RANDOM_LENGTH},
    crypto::MacTag,
    spake2p::PbkdfParameters,
};

/// Client → server: opens the handshake.
#[derive(Clone, PartialEq, Eq)]
pub struct PbkdfParamRequest {
    pub initiator_random: [u8; RANDOM_LENGTH],
    pub initiator_session_id: String,
    pub passcode_id: u16,
    /// The client already holds the PBKDF parameters and does not need them
    /// in the response.
    pub has_pbkdf_parameters: bool,
}

impl PbkdfParamRequest {
    pub fn new(initiator_random: [u8; RANDOM_LENGTH], initiator_session_id: String) -> Self {
        Self {
            initiator_random,
            initiator_session_id,
            passcode_id: DEFAULT_PASSCODE_ID,
            has_pbkdf_parameters: false,
        }
    }
}

impl fmt::Debug for PbkdfParamRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PbkdfParamRequest")
            .field("initiator_random", &colorize(self.initiator_random))
            .field("initiator_session_id", &self.initiator_session_id)
            .field("passcode_id", &self.passcode_id)
            .field("has_pbkdf_parameters", &self.has_pbkdf_parameters)
            .finish()
    }
}

/// Server → client: the responder random and, unless the client said it has
/// them, the PBKDF parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct PbkdfParamResponse {
    pub pbkdf_parameters: Option<PbkdfParameters>,
    pub responder_session_id: String,
    pub responder_random: [u8; RANDOM_LENGTH],
}

impl fmt::Debug for PbkdfParamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PbkdfParamResponse")
            .field("pbkdf_parameters", &self.pbkdf_parameters)
            .field("responder_session_id", &self.responder_session_id)
            .field("responder_random", &colorize(self.responder_random))
            .finish()
    }
}

/// Client → server: the prover share `X`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pake1 {
    pub x: Vec<u8>,
}

/// Server → client: the verifier share `Y` and the server's confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pake2 {
    pub y: Vec<u8>,
    pub cb: MacTag,
}

/// Client → server: the client's confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pake3 {
    pub ca: MacTag,
}
