use std::fmt;

use zeroize::Zeroizing;

use crate::{
    constants::{CRYPTO_GROUP_SIZE_BYTES, SESSION_KEY_LENGTH, VERIFIER_LENGTH},
    crypto::{MacTag, Point, Scalar},
    Error, Result,
};

/// Cost parameters for the passcode derivation.
#[derive(Clone, PartialEq, Eq)]
pub struct PbkdfParameters {
    iterations: u32,
    salt: Vec<u8>,
}

impl PbkdfParameters {
    pub fn new(iterations: u32, salt: impl Into<Vec<u8>>) -> Result<Self> {
        if iterations == 0 {
            return Err(Error::InvalidPbkdfParameters("iteration count must be non-zero"));
        }
        Ok(Self {
            iterations,
            salt: salt.into(),
        })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }
}

impl fmt::Debug for PbkdfParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PbkdfParameters")
            .field("iterations", &self.iterations)
            .field("salt", &hex::encode(&self.salt))
            .finish()
    }
}

/// The form in which a server stores a passcode: `w0` and `L = w1*G`.
///
/// Holding a verifier is enough to act as the server, but not as the client,
/// since `w1` cannot be recovered from `L`.
#[derive(Clone, PartialEq, Eq)]
pub struct Verifier {
    w0: Scalar,
    l: Point,
}

impl Verifier {
    pub fn new(w0: Scalar, l: Point) -> Self {
        Self { w0, l }
    }

    pub fn w0(&self) -> &Scalar {
        &self.w0
    }

    pub fn l(&self) -> &Point {
        &self.l
    }

    /// `w0 (32 bytes, big-endian) || L (65 bytes, uncompressed SEC1)`
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let mut out = Zeroizing::new(Vec::with_capacity(VERIFIER_LENGTH));
        out.extend_from_slice(&self.w0.to_be_bytes());
        out.extend_from_slice(&self.l.to_uncompressed());
        out
    }

    pub fn from_bytes(b: &[u8]) -> Result<Self> {
        if b.len() != VERIFIER_LENGTH {
            return Err(Error::InvalidVerifier);
        }
        let (w0, l) = b.split_at(CRYPTO_GROUP_SIZE_BYTES);
        let w0: [u8; CRYPTO_GROUP_SIZE_BYTES] = w0.try_into()?;
        let w0 = Scalar::from_be_bytes(&w0).ok_or(Error::InvalidVerifier)?;
        let l = Point::from_sec1(l).ok_or(Error::InvalidVerifier)?;
        Ok(Self { w0, l })
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("l", &self.l)
            .finish_non_exhaustive()
    }
}

/// Encryption key agreed by a successful exchange.
pub type SessionKey = Zeroizing<[u8; SESSION_KEY_LENGTH]>;

/// Outputs of one SPAKE2+ exchange: the session key and both confirmation
/// values.
pub struct Verifiers {
    pub ke: SessionKey,
    /// Sent by the prover (client).
    pub ca: MacTag,
    /// Sent by the verifier (server).
    pub cb: MacTag,
}

impl fmt::Debug for Verifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifiers")
            .field("ca", &hex::encode(self.ca))
            .field("cb", &hex::encode(self.cb))
            .finish_non_exhaustive()
    }
}
