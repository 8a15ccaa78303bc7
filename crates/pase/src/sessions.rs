//! PASE session state machines.
//!
//! A pairing is driven entirely by the client: [`PaseClient::initiate_pairing`]
//! sends each message to a [`PaseResponder`] and waits for the reply before
//! moving on. The server side only reacts, advancing its own state as each
//! message arrives.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    messages::{Pake1, Pake2, Pake3, PbkdfParamRequest, PbkdfParamResponse},
    spake2p::SessionKey,
    Result,
};

mod client;
pub use client::{ClientState, PaseClient};

mod server;
pub use server::{PaseServer, ServerState};

/// The server end of a pairing as seen by the client.
#[async_trait]
pub trait PaseResponder: Send {
    async fn pbkdf_param_request(&mut self, req: PbkdfParamRequest) -> Result<PbkdfParamResponse>;

    async fn pase_pake1(&mut self, msg: Pake1) -> Result<Pake2>;

    /// Returns whether the server accepted the client's confirmation.
    async fn pase_pake3(&mut self, msg: Pake3) -> Result<bool>;
}

#[async_trait]
impl PaseResponder for PaseServer {
    async fn pbkdf_param_request(&mut self, req: PbkdfParamRequest) -> Result<PbkdfParamResponse> {
        self.receive_pbkdf_param_request(&req)
    }

    async fn pase_pake1(&mut self, msg: Pake1) -> Result<Pake2> {
        self.receive_pase_pake1(&msg).await
    }

    async fn pase_pake3(&mut self, msg: Pake3) -> Result<bool> {
        self.receive_pase_pake3(&msg)
    }
}

/// A server session that can be handed to whatever task is carrying its
/// messages. Each message takes the session lock for as long as it is being
/// processed, so messages for one session never interleave.
#[derive(Clone)]
pub struct SharedPaseServer(Arc<Mutex<PaseServer>>);

impl SharedPaseServer {
    pub fn new(server: PaseServer) -> Self {
        Self(Arc::new(Mutex::new(server)))
    }

    pub async fn prepare(&self) -> Result<()> {
        self.0.lock().await.prepare().await
    }

    pub async fn state(&self) -> ServerState {
        self.0.lock().await.state()
    }

    pub async fn session_key(&self) -> Option<SessionKey> {
        self.0.lock().await.session_key()
    }
}

impl fmt::Debug for SharedPaseServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedPaseServer(..)")
    }
}

#[async_trait]
impl PaseResponder for SharedPaseServer {
    async fn pbkdf_param_request(&mut self, req: PbkdfParamRequest) -> Result<PbkdfParamResponse> {
        self.0.lock().await.receive_pbkdf_param_request(&req)
    }

    async fn pase_pake1(&mut self, msg: Pake1) -> Result<Pake2> {
        self.0.lock().await.receive_pase_pake1(&msg).await
    }

    async fn pase_pake3(&mut self, msg: Pake3) -> Result<bool> {
        self.0.lock().await.receive_pase_pake3(&msg)
    }
}
