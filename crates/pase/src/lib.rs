//! # pase - SPAKE2+ passcode-authenticated session establishment
//!
//! A client and a server that share only a low-entropy passcode run the
//! SPAKE2+ exchange over P-256 to agree on a session key, and each proves to
//! the other that it derived the same key before trusting it.
//!
//! The handshake has four logical messages:
//!
//! 1. `PbkdfParamRequest` / `PbkdfParamResponse` - exchange of randoms and
//!    PBKDF parameters.
//! 2. `Pake1` - the client's share `X`.
//! 3. `Pake2` - the server's share `Y` and its confirmation `cB`.
//! 4. `Pake3` - the client's confirmation `cA`.
//!
//! ```no_run
//! # async fn run() -> pase::Result<()> {
//! use pase::{DefaultProvider, PaseClient, PaseServer, PbkdfParameters};
//!
//! let provider = DefaultProvider::shared();
//! let params = PbkdfParameters::new(1000, vec![1, 2, 3, 4])?;
//!
//! let mut server = PaseServer::new(provider.clone(), 123456, params.clone());
//! server.prepare().await?;
//!
//! let mut client = PaseClient::new(provider);
//! let ke = client.initiate_pairing(123456, &params, &mut server).await?;
//! assert_eq!(server.session_key().as_deref(), Some(&*ke));
//! # Ok(())
//! # }
//! ```
//!
//! Primitive operations are reached through an injected [`CryptoProvider`];
//! [`DefaultProvider`] implements it on top of the RustCrypto crates.

#[macro_use]
mod log;

pub mod common;
pub mod constants;
pub mod crypto;
pub mod messages;
pub mod passcode;
pub mod sessions;
pub mod spake2p;

mod error;
pub use error::{Error, Result};

pub use crypto::{CryptoProvider, DefaultProvider, Point, Scalar};
pub use messages::{Pake1, Pake2, Pake3, PbkdfParamRequest, PbkdfParamResponse};
pub use sessions::{
    ClientState, PaseClient, PaseResponder, PaseServer, ServerState, SharedPaseServer,
};
pub use spake2p::{PbkdfParameters, SessionKey, Spake2p, Verifier, Verifiers};

#[cfg(test)]
pub(crate) mod test_utils;
