use std::fmt;

use super::PaseResponder;
use crate::{
    common::{colorize, ct, new_session_id},
    constants::RANDOM_LENGTH,
    crypto::Provider,
    messages::{Pake1, Pake3, PbkdfParamRequest},
    spake2p::{compute_w0_w1, PbkdfParameters, SessionKey, Spake2p},
    Error, Result,
};

// ================================================================ //
//                   Client Sessions States                         //
// ================================================================ //

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Idle,
    ParamsRequested,
    /// `X` sent, waiting for `Y` and `cB`.
    ShareSent,
    /// `cB` checked and `cA` sent, waiting for the server's verdict.
    AwaitingConfirmation,
    Paired,
    /// Terminal. The session must be discarded.
    Failed,
}

impl ClientState {
    pub fn name(&self) -> &'static str {
        match self {
            ClientState::Idle => "Idle",
            ClientState::ParamsRequested => "ParamsRequested",
            ClientState::ShareSent => "ShareSent",
            ClientState::AwaitingConfirmation => "AwaitingConfirmation",
            ClientState::Paired => "Paired",
            ClientState::Failed => "Failed",
        }
    }
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The initiating side of one pairing.
pub struct PaseClient {
    provider: Provider,
    session_id: String,
    has_pbkdf_parameters: bool,
    state: ClientState,
}

impl PaseClient {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            session_id: new_session_id(),
            has_pbkdf_parameters: false,
            state: ClientState::Idle,
        }
    }

    /// Tell the server we already hold the PBKDF parameters, so the ones
    /// passed to [`PaseClient::initiate_pairing`] are used unless the server
    /// sends its own anyway.
    pub fn with_cached_parameters(mut self) -> Self {
        self.has_pbkdf_parameters = true;
        self
    }

    pub fn session_id(&self) -> String {
        String::from("c-") + &self.session_id
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    /// Run the full handshake against `server` and return the session key.
    ///
    /// The server's PBKDF parameters take precedence over `params` whenever
    /// the server supplies them. If the server's confirmation does not check
    /// out, our own confirmation is never sent.
    pub async fn initiate_pairing<R>(
        &mut self,
        passcode: u32,
        params: &PbkdfParameters,
        server: &mut R,
    ) -> Result<SessionKey>
    where
        R: PaseResponder + ?Sized,
    {
        if self.state != ClientState::Idle {
            return Err(Error::State {
                expected: ClientState::Idle.name(),
                found: self.state.name(),
            });
        }

        let result = self.complete_pairing(passcode, params, server).await;
        match result {
            Ok(ke) => {
                self.transition(ClientState::Paired);
                info!("{} paired", self.session_id());
                Ok(ke)
            }
            Err(e) => Err(self.fault(e)),
        }
    }

    async fn complete_pairing<R>(
        &mut self,
        passcode: u32,
        params: &PbkdfParameters,
        server: &mut R,
    ) -> Result<SessionKey>
    where
        R: PaseResponder + ?Sized,
    {
        let mut initiator_random = [0_u8; RANDOM_LENGTH];
        self.provider.fill_random(&mut initiator_random)?;

        let mut req = PbkdfParamRequest::new(initiator_random, self.session_id.clone());
        req.has_pbkdf_parameters = self.has_pbkdf_parameters;
        self.transition(ClientState::ParamsRequested);
        let resp = server.pbkdf_param_request(req).await?;
        debug!(
            "{} pairing with s-{}",
            self.session_id(),
            resp.responder_session_id
        );

        let params = resp.pbkdf_parameters.as_ref().unwrap_or(params);
        let (w0, w1) = compute_w0_w1(&self.provider, params, passcode).await?;

        let context = self
            .provider
            .hash(&[&initiator_random[..], &resp.responder_random[..]]);
        let engine = Spake2p::create(self.provider.clone(), &context, w0)?;
        let x = engine.compute_x();
        trace!("{} sending X={}", self.session_id(), colorize(&x));

        self.transition(ClientState::ShareSent);
        let pake2 = server.pase_pake1(Pake1 { x: x.clone() }).await?;

        let verifiers = engine
            .compute_secret_and_verifiers_from_y(&w1, &x, &pake2.y)
            .await?;
        if !ct::bytes_eq(&verifiers.cb, &pake2.cb) {
            return Err(Error::ConfirmationMismatch { peer: "server" });
        }

        self.transition(ClientState::AwaitingConfirmation);
        let accepted = server.pase_pake3(Pake3 { ca: verifiers.ca }).await?;
        if !accepted {
            return Err(Error::Rejected { peer: "server" });
        }

        Ok(verifiers.ke)
    }

    /// Helper function to perform state transitions.
    fn transition(&mut self, next: ClientState) {
        trace!("{} {} -> {}", self.session_id(), self.state, next);
        self.state = next;
    }

    /// Helper function to perform state transition on error.
    fn fault(&mut self, e: Error) -> Error {
        warn!("{} pairing failed: {e}", self.session_id());
        self.state = ClientState::Failed;
        e
    }
}

impl fmt::Debug for PaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaseClient")
            .field("session_id", &self.session_id)
            .field("has_pbkdf_parameters", &self.has_pbkdf_parameters)
            .field("state", &self.state)
            .finish()
    }
}
