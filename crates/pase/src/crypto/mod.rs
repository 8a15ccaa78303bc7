//! Primitive cryptographic operations consumed by the protocol core.
//!
//! Everything the engine and the sessions need from a cryptographic library
//! goes through [`CryptoProvider`]. Components receive an
//! `Arc<dyn CryptoProvider>` when they are constructed; there is no process
//! wide default.

use std::sync::Arc;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::{
    constants::{CRYPTO_GROUP_SIZE_BYTES, HASH_LENGTH, MAC_LENGTH},
    Result,
};

mod default;
mod ecdh;
mod group;

pub use default::DefaultProvider;
pub use ecdh::EphemeralExchange;
pub use group::{Point, Scalar};

/// Output of the transcript / context hash.
pub type DigestVal = [u8; HASH_LENGTH];

/// Output of the MAC.
pub type MacTag = [u8; MAC_LENGTH];

/// Key material produced by a KDF. Wiped on drop.
pub type SecretBytes = Zeroizing<Vec<u8>>;

/// Shared handle to a provider.
pub type Provider = Arc<dyn CryptoProvider>;

/// Hashing, MACs, key derivation, randomness, and P-256 group operations.
///
/// Implementations must be safe to call concurrently from unrelated
/// sessions. PBKDF2 and HKDF are asynchronous: they may take a long time and
/// must not block the executor.
#[async_trait]
pub trait CryptoProvider: Send + Sync {
    /// SHA-256 over the concatenation of `chunks`.
    fn hash(&self, chunks: &[&[u8]]) -> DigestVal;

    /// HMAC-SHA256 of `data` under `key`.
    fn hmac(&self, key: &[u8], data: &[u8]) -> Result<MacTag>;

    /// PBKDF2-HMAC-SHA256 producing `out_len` bytes.
    async fn pbkdf2(
        &self,
        secret: &[u8],
        salt: &[u8],
        iterations: u32,
        out_len: usize,
    ) -> Result<SecretBytes>;

    /// HKDF-SHA256 extract and expand producing `out_len` bytes.
    async fn hkdf(
        &self,
        secret: &[u8],
        salt: &[u8],
        info: &[u8],
        out_len: usize,
    ) -> Result<SecretBytes>;

    /// Fill `buf` from a cryptographically secure source.
    fn fill_random(&self, buf: &mut [u8]) -> Result<()>;

    /// `k * G`
    fn mul_generator(&self, k: &Scalar) -> Point;

    /// `k * p`
    fn mul(&self, p: &Point, k: &Scalar) -> Point;

    /// `a + b`
    fn add(&self, a: &Point, b: &Point) -> Point;

    /// `-p`
    fn negate(&self, p: &Point) -> Point;

    /// Decode a SEC1 encoded point, rejecting anything that is not a
    /// non-identity point on the curve.
    fn point_from_bytes(&self, bytes: &[u8]) -> Result<Point>;

    /// Uncompressed SEC1 encoding of `p`.
    fn point_to_bytes(&self, p: &Point) -> Vec<u8>;

    /// Generate an ephemeral P-256 ECDH key pair. The returned context is
    /// consumed by the call that completes the exchange.
    fn ecdh_ephemeral(&self) -> Result<EphemeralExchange>;

    /// Scalar drawn uniformly from `[0, n)` by rejection sampling.
    fn random_scalar(&self) -> Result<Scalar> {
        let mut bytes = Zeroizing::new([0_u8; CRYPTO_GROUP_SIZE_BYTES]);
        loop {
            self.fill_random(&mut bytes[..])?;
            if let Some(k) = Scalar::from_be_bytes(&bytes) {
                return Ok(k);
            }
        }
    }
}
