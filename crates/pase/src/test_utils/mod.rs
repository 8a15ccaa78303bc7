#![allow(dead_code)]

use std::env;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use async_trait::async_trait;
use tracing_subscriber::filter::LevelFilter;

use crate::{
    crypto::{
        CryptoProvider, DefaultProvider, DigestVal, EphemeralExchange, MacTag, Point, Scalar,
        SecretBytes,
    },
    spake2p::PbkdfParameters,
    Result,
};

static SUBSCRIBER_INIT: Once = Once::new();

pub fn init_subscriber() {
    SUBSCRIBER_INIT.call_once(|| {
        let level = env::var("RUST_LOG_LEVEL").unwrap_or("error".into());
        let lf = LevelFilter::from_str(&level).unwrap();

        tracing_subscriber::fmt().with_max_level(lf).init();
    });
}

/// Salt `[1, 2, 3, 4]`, 1000 iterations.
pub fn test_params() -> PbkdfParameters {
    PbkdfParameters::new(1000, vec![1, 2, 3, 4]).unwrap()
}

/// Wraps [`DefaultProvider`] and counts scalar multiplications.
#[derive(Default)]
pub struct CountingProvider {
    inner: DefaultProvider,
    muls: AtomicUsize,
}

impl CountingProvider {
    pub fn multiplications(&self) -> usize {
        self.muls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CryptoProvider for CountingProvider {
    fn hash(&self, chunks: &[&[u8]]) -> DigestVal {
        self.inner.hash(chunks)
    }

    fn hmac(&self, key: &[u8], data: &[u8]) -> Result<MacTag> {
        self.inner.hmac(key, data)
    }

    async fn pbkdf2(
        &self,
        secret: &[u8],
        salt: &[u8],
        iterations: u32,
        out_len: usize,
    ) -> Result<SecretBytes> {
        self.inner.pbkdf2(secret, salt, iterations, out_len).await
    }

    async fn hkdf(
        &self,
        secret: &[u8],
        salt: &[u8],
        info: &[u8],
        out_len: usize,
    ) -> Result<SecretBytes> {
        self.inner.hkdf(secret, salt, info, out_len).await
    }

    fn fill_random(&self, buf: &mut [u8]) -> Result<()> {
        self.inner.fill_random(buf)
    }

    fn mul_generator(&self, k: &Scalar) -> Point {
        self.muls.fetch_add(1, Ordering::SeqCst);
        self.inner.mul_generator(k)
    }

    fn mul(&self, p: &Point, k: &Scalar) -> Point {
        self.muls.fetch_add(1, Ordering::SeqCst);
        self.inner.mul(p, k)
    }

    fn add(&self, a: &Point, b: &Point) -> Point {
        self.inner.add(a, b)
    }

    fn negate(&self, p: &Point) -> Point {
        self.inner.negate(p)
    }

    fn point_from_bytes(&self, bytes: &[u8]) -> Result<Point> {
        self.inner.point_from_bytes(bytes)
    }

    fn point_to_bytes(&self, p: &Point) -> Vec<u8> {
        self.inner.point_to_bytes(p)
    }

    fn ecdh_ephemeral(&self) -> Result<EphemeralExchange> {
        self.inner.ecdh_ephemeral()
    }
}
