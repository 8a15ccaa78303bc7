use std::sync::Arc;

use async_trait::async_trait;
use digest::Mac;
use hkdf::Hkdf;
use sha2::{Digest, Sha256};

use super::{
    group::{Point, Scalar},
    CryptoProvider, DigestVal, EphemeralExchange, MacTag, SecretBytes,
};
use crate::{common::HmacSha256, Error, Result};

/// Provider backed by the RustCrypto `sha2`, `hmac`, `hkdf`, `pbkdf2` and
/// `p256` crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultProvider;

impl DefaultProvider {
    pub fn shared() -> Arc<dyn CryptoProvider> {
        Arc::new(DefaultProvider)
    }
}

#[async_trait]
impl CryptoProvider for DefaultProvider {
    fn hash(&self, chunks: &[&[u8]]) -> DigestVal {
        let mut hasher = Sha256::new();
        for chunk in chunks {
            hasher.update(chunk);
        }
        hasher.finalize().into()
    }

    fn hmac(&self, key: &[u8], data: &[u8]) -> Result<MacTag> {
        let mut mac = HmacSha256::new_from_slice(key)?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().into())
    }

    async fn pbkdf2(
        &self,
        secret: &[u8],
        salt: &[u8],
        iterations: u32,
        out_len: usize,
    ) -> Result<SecretBytes> {
        if iterations == 0 {
            return Err(Error::InvalidPbkdfParameters("iteration count must be non-zero"));
        }
        let secret = SecretBytes::new(secret.to_vec());
        let salt = salt.to_vec();
        let out = tokio::task::spawn_blocking(move || {
            let mut out = SecretBytes::new(vec![0_u8; out_len]);
            pbkdf2::pbkdf2_hmac::<Sha256>(&secret, &salt, iterations, &mut out);
            out
        })
        .await?;
        Ok(out)
    }

    async fn hkdf(
        &self,
        secret: &[u8],
        salt: &[u8],
        info: &[u8],
        out_len: usize,
    ) -> Result<SecretBytes> {
        let hk = Hkdf::<Sha256>::new(Some(salt), secret);
        let mut okm = SecretBytes::new(vec![0_u8; out_len]);
        hk.expand(info, &mut okm)
            .map_err(|_| Error::InvalidKdfOutputLength)?;
        Ok(okm)
    }

    fn fill_random(&self, buf: &mut [u8]) -> Result<()> {
        getrandom::getrandom(buf)?;
        Ok(())
    }

    fn mul_generator(&self, k: &Scalar) -> Point {
        Point(p256::ProjectivePoint::GENERATOR * k.0)
    }

    fn mul(&self, p: &Point, k: &Scalar) -> Point {
        Point(p.0 * k.0)
    }

    fn add(&self, a: &Point, b: &Point) -> Point {
        Point(a.0 + b.0)
    }

    fn negate(&self, p: &Point) -> Point {
        Point(-p.0)
    }

    fn point_from_bytes(&self, bytes: &[u8]) -> Result<Point> {
        Point::from_sec1(bytes).ok_or(Error::InvalidPoint { what: "point" })
    }

    fn point_to_bytes(&self, p: &Point) -> Vec<u8> {
        p.to_uncompressed()
    }

    fn ecdh_ephemeral(&self) -> Result<EphemeralExchange> {
        let secret = p256::ecdh::EphemeralSecret::random(&mut rand::rngs::OsRng);
        Ok(EphemeralExchange::new(secret))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn sha256_known_answer() {
        let p = DefaultProvider;
        let expected = hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert_eq!(p.hash(&[b"abc"]), expected);
        assert_eq!(p.hash(&[b"a", b"bc"]), expected);
        assert_eq!(p.hash(&[b"", b"abc", b""]), expected);
    }

    #[test]
    fn hmac_rfc4231_case_2() {
        let p = DefaultProvider;
        let tag = p.hmac(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            tag,
            hex!("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
        );
    }

    #[tokio::test]
    async fn pbkdf2_known_answer() {
        let p = DefaultProvider;
        let out = p.pbkdf2(b"password", b"salt", 1, 32).await.unwrap();
        assert_eq!(
            &out[..],
            &hex!("120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b")[..]
        );

        let err = p.pbkdf2(b"password", b"salt", 0, 32).await.unwrap_err();
        assert!(matches!(err, Error::InvalidPbkdfParameters(_)));
    }

    #[tokio::test]
    async fn hkdf_rfc5869_case_1() {
        let p = DefaultProvider;
        let ikm = hex!("0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b");
        let salt = hex!("000102030405060708090a0b0c");
        let info = hex!("f0f1f2f3f4f5f6f7f8f9");
        let okm = p.hkdf(&ikm, &salt, &info, 42).await.unwrap();
        assert_eq!(
            &okm[..],
            &hex!(
                "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865"
            )[..]
        );

        // 255 * 32 is the most HKDF-SHA256 can produce
        let err = p.hkdf(&ikm, &salt, &info, 255 * 32 + 1).await.unwrap_err();
        assert!(matches!(err, Error::InvalidKdfOutputLength));
    }

    #[test]
    fn group_operations_are_consistent() {
        let p = DefaultProvider;
        let two = Scalar::from(2);
        let g = Point::generator();

        let doubled = p.add(&g, &g);
        assert_eq!(p.mul_generator(&two), doubled);
        assert_eq!(p.mul(&g, &two), doubled);

        // 2G + (-G) = G
        assert_eq!(p.add(&doubled, &p.negate(&g)), g);

        let enc = p.point_to_bytes(&doubled);
        assert_eq!(p.point_from_bytes(&enc).unwrap(), doubled);
        assert!(p.point_from_bytes(&[0x04; 65]).unwrap_err().is_validation());
    }

    #[test]
    fn random_scalars_differ() {
        let p = DefaultProvider;
        let a = p.random_scalar().unwrap();
        let b = p.random_scalar().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn ecdh_both_sides_agree() {
        let p = DefaultProvider;
        let alice = p.ecdh_ephemeral().unwrap();
        let bob = p.ecdh_ephemeral().unwrap();
        assert_eq!(alice.public_key().len(), 65);

        let alice_pub = alice.public_key().to_vec();
        let bob_pub = bob.public_key().to_vec();

        let k1 = alice.diffie_hellman(&bob_pub).unwrap();
        let k2 = bob.diffie_hellman(&alice_pub).unwrap();
        assert_eq!(k1, k2);
        assert_eq!(k1.len(), 32);
    }

    #[test]
    fn ecdh_rejects_bad_peer_key() {
        let p = DefaultProvider;
        let alice = p.ecdh_ephemeral().unwrap();
        let err = alice.diffie_hellman(&[0x04; 65]).unwrap_err();
        assert!(err.is_validation());
    }
}
