//! The SPAKE2+ exchange over P-256.
//!
//! The prover (client) knows `w0` and `w1`; the verifier (server) knows `w0`
//! and `L = w1*G`. Each side contributes a blinded share, `X` from the prover
//! and `Y` from the verifier, and both derive the same pair of points `Z` and
//! `V` only when their passcodes agree:
//!
//! ```txt
//!   X = r*G + w0*M                  Y = r*G + w0*N
//!   prover:   Z = r*(Y - w0*N)      V = w1*(Y - w0*N)
//!   verifier: Z = r*(X - w0*M)      V = r*L
//! ```
//!
//! The transcript `TT` binds the context, the fixed points `M` and `N`, both
//! shares, `Z`, `V` and `w0`. Its SHA-256 hash is split into `Ka || Ke`, and
//! `Ka` is expanded with HKDF into the confirmation keys `KcA || KcB`:
//!
//! ```txt
//!   cA = HMAC(KcA, Y)
//!   cB = HMAC(KcB, X)
//! ```

use zeroize::Zeroizing;

use crate::{
    common::{colorize, transcript::Transcript},
    constants::{
        CONFIRMATION_KEYS_INFO, CONFIRMATION_KEY_LENGTH, CRYPTO_W_SIZE_BYTES, M_BYTES, N_BYTES,
        SESSION_KEY_LENGTH,
    },
    crypto::{Point, Provider, Scalar},
    passcode, Error, Result,
};

mod params;
pub use params::{PbkdfParameters, SessionKey, Verifier, Verifiers};

/// Derive the prover's secrets `(w0, w1)` from a passcode.
pub async fn compute_w0_w1(
    provider: &Provider,
    params: &PbkdfParameters,
    passcode: u32,
) -> Result<(Scalar, Scalar)> {
    let ws = provider
        .pbkdf2(
            &passcode::to_bytes(passcode),
            params.salt(),
            params.iterations(),
            CRYPTO_W_SIZE_BYTES * 2,
        )
        .await?;
    let w0 = Scalar::from_be_bytes_reduced(&ws[..CRYPTO_W_SIZE_BYTES]);
    let w1 = Scalar::from_be_bytes_reduced(&ws[CRYPTO_W_SIZE_BYTES..]);
    Ok((w0, w1))
}

/// Derive the verifier record `(w0, L)` a server stores for a passcode.
pub async fn compute_w0_l(
    provider: &Provider,
    params: &PbkdfParameters,
    passcode: u32,
) -> Result<Verifier> {
    let (w0, w1) = compute_w0_w1(provider, params, passcode).await?;
    let l = provider.mul_generator(&w1);
    Ok(Verifier::new(w0, l))
}

/// One side of a single SPAKE2+ exchange.
///
/// An instance carries the per-exchange random `r`; create a new one for
/// every exchange.
pub struct Spake2p {
    provider: Provider,
    context: Vec<u8>,
    random: Scalar,
    w0: Scalar,
    m: Point,
    n: Point,
}

impl Spake2p {
    /// Start an exchange with a fresh uniformly random `r`.
    pub fn create(provider: Provider, context: &[u8], w0: Scalar) -> Result<Self> {
        let random = provider.random_scalar()?;
        Self::new(provider, context, random, w0)
    }

    /// Start an exchange with a caller-chosen `r`.
    pub fn new(provider: Provider, context: &[u8], random: Scalar, w0: Scalar) -> Result<Self> {
        let m = provider.point_from_bytes(&M_BYTES)?;
        let n = provider.point_from_bytes(&N_BYTES)?;
        Ok(Self {
            provider,
            context: context.to_vec(),
            random,
            w0,
            m,
            n,
        })
    }

    /// The prover's share `X = r*G + w0*M`, encoded.
    pub fn compute_x(&self) -> Vec<u8> {
        self.share(&self.m)
    }

    /// The verifier's share `Y = r*G + w0*N`, encoded.
    pub fn compute_y(&self) -> Vec<u8> {
        self.share(&self.n)
    }

    fn share(&self, blind: &Point) -> Vec<u8> {
        let p = &self.provider;
        let share = p.add(&p.mul_generator(&self.random), &p.mul(blind, &self.w0));
        p.point_to_bytes(&share)
    }

    /// Prover side: derive the exchange outputs from the peer's `Y`.
    ///
    /// `Y` is validated before any secret-dependent arithmetic happens.
    pub async fn compute_secret_and_verifiers_from_y(
        &self,
        w1: &Scalar,
        x: &[u8],
        y: &[u8],
    ) -> Result<Verifiers> {
        let p = &self.provider;
        let y_point = p
            .point_from_bytes(y)
            .map_err(|_| Error::InvalidPoint { what: "Y" })?;

        let unblinded = p.add(&y_point, &p.negate(&p.mul(&self.n, &self.w0)));
        let z = p.mul(&unblinded, &self.random);
        let v = p.mul(&unblinded, w1);
        self.compute_secret_and_verifiers(x, y, &z, &v).await
    }

    /// Verifier side: derive the exchange outputs from the peer's `X`.
    ///
    /// `X` is validated before any secret-dependent arithmetic happens.
    pub async fn compute_secret_and_verifiers_from_x(
        &self,
        l: &Point,
        x: &[u8],
        y: &[u8],
    ) -> Result<Verifiers> {
        let p = &self.provider;
        let x_point = p
            .point_from_bytes(x)
            .map_err(|_| Error::InvalidPoint { what: "X" })?;

        let unblinded = p.add(&x_point, &p.negate(&p.mul(&self.m, &self.w0)));
        let z = p.mul(&unblinded, &self.random);
        let v = p.mul(l, &self.random);
        self.compute_secret_and_verifiers(x, y, &z, &v).await
    }

    async fn compute_secret_and_verifiers(
        &self,
        x: &[u8],
        y: &[u8],
        z: &Point,
        v: &Point,
    ) -> Result<Verifiers> {
        let p = &self.provider;
        trace!("X={} Y={}", colorize(x), colorize(y));

        let tt_hash = Zeroizing::new(p.hash(&[self.transcript(x, y, z, v).as_bytes()]));
        let (ka, ke_bytes) = tt_hash.split_at(SESSION_KEY_LENGTH);

        let kc_ab = p
            .hkdf(ka, &[], CONFIRMATION_KEYS_INFO, 2 * CONFIRMATION_KEY_LENGTH)
            .await?;
        let (kc_a, kc_b) = kc_ab.split_at(CONFIRMATION_KEY_LENGTH);

        let mut ke = SessionKey::default();
        ke.copy_from_slice(ke_bytes);

        Ok(Verifiers {
            ke,
            ca: p.hmac(kc_a, y)?,
            cb: p.hmac(kc_b, x)?,
        })
    }

    fn transcript(&self, x: &[u8], y: &[u8], z: &Point, v: &Point) -> Transcript {
        let p = &self.provider;
        let mut tt = Transcript::new();
        tt.write(&self.context)
            .write(b"")
            .write(b"")
            .write(&p.point_to_bytes(&self.m))
            .write(&p.point_to_bytes(&self.n))
            .write(x)
            .write(y)
            .write(&p.point_to_bytes(z))
            .write(&p.point_to_bytes(v))
            .write(&self.w0.to_be_bytes());
        tt
    }
}
