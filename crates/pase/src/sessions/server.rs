use std::fmt;

use crate::{
    common::{colorize, ct, new_session_id},
    constants::RANDOM_LENGTH,
    crypto::{MacTag, Provider},
    messages::{Pake1, Pake2, Pake3, PbkdfParamRequest, PbkdfParamResponse},
    spake2p::{compute_w0_l, PbkdfParameters, SessionKey, Spake2p, Verifier},
    Error, Result,
};

// ================================================================ //
//                   Server Sessions States                         //
// ================================================================ //

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Configured, verifier not yet derived.
    Idle,
    /// Verifier ready, waiting for the parameter request.
    ParamsPending,
    AwaitingPake1,
    AwaitingPake3,
    Paired,
    /// Terminal. The session must be discarded.
    Failed,
}

impl ServerState {
    pub fn name(&self) -> &'static str {
        match self {
            ServerState::Idle => "Idle",
            ServerState::ParamsPending => "ParamsPending",
            ServerState::AwaitingPake1 => "AwaitingPake1",
            ServerState::AwaitingPake3 => "AwaitingPake3",
            ServerState::Paired => "Paired",
            ServerState::Failed => "Failed",
        }
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The responding side of one pairing.
pub struct PaseServer {
    // -------- fixed by server --------
    provider: Provider,
    params: PbkdfParameters,
    /// Only held until the verifier has been derived.
    passcode: Option<u32>,
    verifier: Option<Verifier>,

    // -------- generated per session --------
    session_id: String,
    initiator_random: Option<[u8; RANDOM_LENGTH]>,
    responder_random: Option<[u8; RANDOM_LENGTH]>,
    ke: Option<SessionKey>,
    ca: Option<MacTag>,

    state: ServerState,
}

impl PaseServer {
    /// Store the configuration for a new session. The verifier is not derived
    /// until [`PaseServer::prepare`] is awaited.
    pub fn new(provider: Provider, passcode: u32, params: PbkdfParameters) -> Self {
        Self::build(provider, params, Some(passcode), None, ServerState::Idle)
    }

    /// Build a session from a verifier record that was derived earlier. The
    /// session is ready for the parameter request immediately.
    pub fn with_verifier(provider: Provider, verifier: Verifier, params: PbkdfParameters) -> Self {
        Self::build(
            provider,
            params,
            None,
            Some(verifier),
            ServerState::ParamsPending,
        )
    }

    fn build(
        provider: Provider,
        params: PbkdfParameters,
        passcode: Option<u32>,
        verifier: Option<Verifier>,
        state: ServerState,
    ) -> Self {
        Self {
            provider,
            params,
            passcode,
            verifier,
            session_id: new_session_id(),
            initiator_random: None,
            responder_random: None,
            ke: None,
            ca: None,
            state,
        }
    }

    pub fn session_id(&self) -> String {
        String::from("s-") + &self.session_id
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn pbkdf_parameters(&self) -> &PbkdfParameters {
        &self.params
    }

    /// The verifier record in use, once derived.
    pub fn verifier(&self) -> Option<&Verifier> {
        self.verifier.as_ref()
    }

    /// The agreed session key. Only available once the client's confirmation
    /// has been accepted.
    pub fn session_key(&self) -> Option<SessionKey> {
        match self.state {
            ServerState::Paired => self.ke.clone(),
            _ => None,
        }
    }

    /// Derive the verifier `(w0, L)` from the configured passcode.
    pub async fn prepare(&mut self) -> Result<()> {
        self.expect_state(ServerState::Idle)?;
        let passcode = match self.passcode.take() {
            Some(p) => p,
            None => return Err(self.fault(Error::other("no passcode configured"))),
        };

        let derived = compute_w0_l(&self.provider, &self.params, passcode).await;
        match derived {
            Ok(verifier) => {
                self.verifier = Some(verifier);
                self.transition(ServerState::ParamsPending);
                Ok(())
            }
            Err(e) => Err(self.fault(e)),
        }
    }

    /// Handle the client's opening message.
    pub fn receive_pbkdf_param_request(
        &mut self,
        req: &PbkdfParamRequest,
    ) -> Result<PbkdfParamResponse> {
        self.expect_state(ServerState::ParamsPending)?;
        debug!(
            "{} param request from c-{} passcode_id={}",
            self.session_id(),
            req.initiator_session_id,
            req.passcode_id
        );

        let mut responder_random = [0_u8; RANDOM_LENGTH];
        if let Err(e) = self.provider.fill_random(&mut responder_random) {
            return Err(self.fault(e));
        }
        self.initiator_random = Some(req.initiator_random);
        self.responder_random = Some(responder_random);

        let pbkdf_parameters = if req.has_pbkdf_parameters {
            None
        } else {
            Some(self.params.clone())
        };

        self.transition(ServerState::AwaitingPake1);
        Ok(PbkdfParamResponse {
            pbkdf_parameters,
            responder_session_id: self.session_id.clone(),
            responder_random,
        })
    }

    /// Handle the client's share `X` and answer with `Y` and `cB`.
    pub async fn receive_pase_pake1(&mut self, msg: &Pake1) -> Result<Pake2> {
        self.expect_state(ServerState::AwaitingPake1)?;
        let processed = self.process_pake1(msg).await;
        match processed {
            Ok(pake2) => {
                self.transition(ServerState::AwaitingPake3);
                Ok(pake2)
            }
            Err(e) => Err(self.fault(e)),
        }
    }

    async fn process_pake1(&mut self, msg: &Pake1) -> Result<Pake2> {
        let (initiator_random, responder_random) =
            match (self.initiator_random, self.responder_random) {
                (Some(i), Some(r)) => (i, r),
                _ => {
                    return Err(Error::State {
                        expected: ServerState::AwaitingPake1.name(),
                        found: ServerState::ParamsPending.name(),
                    })
                }
            };
        let verifier = self.verifier.as_ref().ok_or(Error::State {
            expected: ServerState::ParamsPending.name(),
            found: ServerState::Idle.name(),
        })?;

        let context = self
            .provider
            .hash(&[&initiator_random[..], &responder_random[..]]);
        let engine = Spake2p::create(self.provider.clone(), &context, *verifier.w0())?;
        let y = engine.compute_y();
        let verifiers = engine
            .compute_secret_and_verifiers_from_x(verifier.l(), &msg.x, &y)
            .await?;
        trace!("{} sending Y={}", self.session_id(), colorize(&y));

        self.ke = Some(verifiers.ke);
        self.ca = Some(verifiers.ca);
        Ok(Pake2 {
            y,
            cb: verifiers.cb,
        })
    }

    /// Check the client's confirmation. Returns `Ok(true)` once paired; a
    /// mismatch fails the session.
    pub fn receive_pase_pake3(&mut self, msg: &Pake3) -> Result<bool> {
        self.expect_state(ServerState::AwaitingPake3)?;

        let confirmed = match self.ca.take() {
            Some(expected) => ct::bytes_eq(&expected, &msg.ca),
            None => false,
        };
        if !confirmed {
            return Err(self.fault(Error::ConfirmationMismatch { peer: "client" }));
        }

        self.transition(ServerState::Paired);
        info!("{} paired", self.session_id());
        Ok(true)
    }

    fn expect_state(&mut self, expected: ServerState) -> Result<()> {
        if self.state == expected {
            return Ok(());
        }
        let e = Error::State {
            expected: expected.name(),
            found: self.state.name(),
        };
        Err(self.fault(e))
    }

    /// Helper function to perform state transitions.
    fn transition(&mut self, next: ServerState) {
        trace!("{} {} -> {}", self.session_id(), self.state, next);
        self.state = next;
    }

    /// Helper function to perform state transition on error. Drops any
    /// derived key material and hands the error back to the caller.
    fn fault(&mut self, e: Error) -> Error {
        warn!("{} pairing failed: {e}", self.session_id());
        self.state = ServerState::Failed;
        self.ke = None;
        self.ca = None;
        e
    }
}

impl fmt::Debug for PaseServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaseServer")
            .field("session_id", &self.session_id)
            .field("params", &self.params)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
