//! P-256 scalars and points.

use std::fmt;

use num_bigint::BigUint;
use p256::elliptic_curve::{
    bigint::U256,
    ff::PrimeField,
    ops::Reduce,
    sec1::{FromEncodedPoint, ToEncodedPoint},
};
use p256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint};

use crate::constants::{CRYPTO_GROUP_SIZE_BYTES, GROUP_ORDER};

/// An integer modulo the P-256 group order.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Scalar(pub(crate) p256::Scalar);

impl Scalar {
    /// Interpret `bytes` as a big-endian unsigned integer of any length and
    /// reduce it modulo the group order.
    pub fn from_be_bytes_reduced(bytes: &[u8]) -> Self {
        let order = BigUint::from_bytes_be(&GROUP_ORDER);
        let reduced = BigUint::from_bytes_be(bytes) % order;
        Self::from_biguint_below_order(&reduced)
    }

    /// Canonical 32-byte big-endian decoding. Returns `None` for values that
    /// are not below the group order.
    pub fn from_be_bytes(bytes: &[u8; CRYPTO_GROUP_SIZE_BYTES]) -> Option<Self> {
        let repr = FieldBytes::clone_from_slice(bytes);
        let k: Option<p256::Scalar> = p256::Scalar::from_repr(repr).into();
        k.map(Scalar)
    }

    /// Fixed-width 32-byte big-endian encoding.
    pub fn to_be_bytes(&self) -> [u8; CRYPTO_GROUP_SIZE_BYTES] {
        let mut out = [0_u8; CRYPTO_GROUP_SIZE_BYTES];
        out.copy_from_slice(&self.0.to_repr());
        out
    }

    /// Decimal rendering of the integer value.
    pub fn to_decimal(&self) -> String {
        BigUint::from_bytes_be(&self.to_be_bytes()).to_string()
    }

    /// Parse a decimal integer. Returns `None` if the text is not a
    /// non-negative integer below the group order.
    pub fn from_decimal(s: &str) -> Option<Self> {
        let value = BigUint::parse_bytes(s.trim().as_bytes(), 10)?;
        if value >= BigUint::from_bytes_be(&GROUP_ORDER) {
            return None;
        }
        Some(Self::from_biguint_below_order(&value))
    }

    fn from_biguint_below_order(value: &BigUint) -> Self {
        let be = value.to_bytes_be();
        let mut padded = [0_u8; CRYPTO_GROUP_SIZE_BYTES];
        padded[CRYPTO_GROUP_SIZE_BYTES - be.len()..].copy_from_slice(&be);
        // already below n, so this reduction is the identity
        let repr = FieldBytes::clone_from_slice(&padded);
        Scalar(<p256::Scalar as Reduce<U256>>::reduce_bytes(&repr))
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar(p256::Scalar::from(v))
    }
}

// Scalars are usually secret; keep them out of logs.
impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar(..)")
    }
}

/// A point on P-256.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Point(pub(crate) ProjectivePoint);

impl Point {
    pub fn generator() -> Self {
        Point(ProjectivePoint::GENERATOR)
    }

    /// Decode a compressed or uncompressed SEC1 point. Fails for malformed
    /// encodings, coordinates that are not on the curve, and the identity.
    pub fn from_sec1(bytes: &[u8]) -> Option<Self> {
        let encoded = EncodedPoint::from_bytes(bytes).ok()?;
        let affine: Option<AffinePoint> = AffinePoint::from_encoded_point(&encoded).into();
        let point = ProjectivePoint::from(affine?);
        if point == ProjectivePoint::IDENTITY {
            return None;
        }
        Some(Point(point))
    }

    /// Uncompressed SEC1 encoding.
    pub fn to_uncompressed(&self) -> Vec<u8> {
        AffinePoint::from(self.0)
            .to_encoded_point(false)
            .as_bytes()
            .to_vec()
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({})", hex::encode(self.to_uncompressed()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants::{M_BYTES, N_BYTES, POINT_LENGTH};
    use hex_literal::hex;

    #[test]
    fn reduction_wraps_at_group_order() {
        // n + 5 over 40 bytes
        let mut wide = [0_u8; 40];
        wide[8..].copy_from_slice(&GROUP_ORDER);
        wide[39] += 5;
        assert_eq!(Scalar::from_be_bytes_reduced(&wide), Scalar::from(5));

        // exactly n reduces to zero
        assert_eq!(Scalar::from_be_bytes_reduced(&GROUP_ORDER), Scalar::from(0));
    }

    #[test]
    fn reduction_of_small_values_is_identity() {
        let mut bytes = [0_u8; 40];
        bytes[38] = 0x01;
        bytes[39] = 0x02;
        assert_eq!(Scalar::from_be_bytes_reduced(&bytes), Scalar::from(0x0102));
    }

    #[test]
    fn canonical_decoding_rejects_order() {
        assert!(Scalar::from_be_bytes(&GROUP_ORDER).is_none());
        assert!(Scalar::from_be_bytes(&[0xff; 32]).is_none());
        let one = Scalar::from_be_bytes(&hex!(
            "0000000000000000000000000000000000000000000000000000000000000001"
        ));
        assert_eq!(one, Some(Scalar::from(1)));
    }

    #[test]
    fn decimal_roundtrip() {
        let k = Scalar::from(1234567890123456789);
        assert_eq!(k.to_decimal(), "1234567890123456789");
        assert_eq!(Scalar::from_decimal("1234567890123456789"), Some(k));

        let big = Scalar::from_be_bytes_reduced(&[0xaa; 40]);
        assert_eq!(Scalar::from_decimal(&big.to_decimal()), Some(big));

        assert!(Scalar::from_decimal("not a number").is_none());
        assert!(Scalar::from_decimal("-1").is_none());
        let order = BigUint::from_bytes_be(&GROUP_ORDER).to_string();
        assert!(Scalar::from_decimal(&order).is_none());
    }

    #[test]
    fn spake2p_constants_decode() {
        let m = Point::from_sec1(&M_BYTES).expect("M must be on the curve");
        let n = Point::from_sec1(&N_BYTES).expect("N must be on the curve");
        assert_ne!(m, n);

        let m_enc = m.to_uncompressed();
        assert_eq!(m_enc.len(), POINT_LENGTH);
        assert_eq!(m_enc[0], 0x04);
        assert_eq!(&m_enc[1..33], &M_BYTES[1..]);
        assert_eq!(Point::from_sec1(&m_enc), Some(m));
    }

    #[test]
    fn invalid_encodings_are_rejected() {
        // identity
        assert!(Point::from_sec1(&[0x00]).is_none());
        // empty
        assert!(Point::from_sec1(&[]).is_none());
        // wrong tag / length
        assert!(Point::from_sec1(&[0x05; 65]).is_none());
        // well-formed uncompressed encoding that is not on the curve
        let mut off_curve = Point::generator().to_uncompressed();
        off_curve[64] ^= 0x01;
        assert!(Point::from_sec1(&off_curve).is_none());
    }

    #[test]
    fn scalars_stay_out_of_debug_output() {
        assert_eq!(format!("{:?}", Scalar::from(42)), "Scalar(..)");
    }
}
