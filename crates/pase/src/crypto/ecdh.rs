use p256::{ecdh::EphemeralSecret, elliptic_curve::sec1::ToEncodedPoint, PublicKey};

use super::SecretBytes;
use crate::{Error, Result};

/// One side of an ephemeral P-256 Diffie-Hellman exchange.
///
/// The private half never leaves this value and completing the exchange
/// consumes it, so a key pair cannot be used twice.
pub struct EphemeralExchange {
    secret: EphemeralSecret,
    public: Vec<u8>,
}

impl EphemeralExchange {
    pub(crate) fn new(secret: EphemeralSecret) -> Self {
        let public = secret
            .public_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec();
        Self { secret, public }
    }

    /// Uncompressed SEC1 encoding of our public key.
    pub fn public_key(&self) -> &[u8] {
        &self.public
    }

    /// Complete the exchange against the peer's SEC1 encoded public key and
    /// return the raw shared x-coordinate.
    pub fn diffie_hellman(self, peer: &[u8]) -> Result<SecretBytes> {
        let peer = PublicKey::from_sec1_bytes(peer)
            .map_err(|_| Error::InvalidPoint { what: "peer key" })?;
        let shared = self.secret.diffie_hellman(&peer);
        Ok(SecretBytes::new(shared.raw_secret_bytes().to_vec()))
    }
}

impl std::fmt::Debug for EphemeralExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralExchange")
            .field("public", &hex::encode(&self.public))
            .finish_non_exhaustive()
    }
}
