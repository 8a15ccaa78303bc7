use hex_literal::hex;

//=============================[Group / Scalars]===============================//

/// Byte length of a P-256 scalar or field element.
pub const CRYPTO_GROUP_SIZE_BYTES: usize = 32;

/// Byte length of each PBKDF2 output half used to derive w0 and w1. The
/// extra 8 bytes keep the bias of the modular reduction negligible.
pub const CRYPTO_W_SIZE_BYTES: usize = CRYPTO_GROUP_SIZE_BYTES + 8;

/// Length of an uncompressed SEC1 point encoding (`04 || x || y`).
pub const POINT_LENGTH: usize = 1 + 2 * CRYPTO_GROUP_SIZE_BYTES;

/// Order `n` of the P-256 group, big-endian.
pub const GROUP_ORDER: [u8; CRYPTO_GROUP_SIZE_BYTES] =
    hex!("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551");

/// SPAKE2+ point M for P-256 (draft-bar-cfrg-spake2plus-01), compressed.
pub const M_BYTES: [u8; 33] =
    hex!("02886e2f97ace46e55ba9dd7242579f2993b64e16ef3dcab95afd497333d8fa12f");

/// SPAKE2+ point N for P-256 (draft-bar-cfrg-spake2plus-01), compressed.
pub const N_BYTES: [u8; 33] =
    hex!("03d8bbd6c639c62937b04d997f38c3770719c629d7014d49a24b4f98baa1292b49");

//===============================[Primitives]==================================//

pub const SHA256_SIZE: usize = 32;
pub const HASH_LENGTH: usize = SHA256_SIZE;
pub const MAC_LENGTH: usize = SHA256_SIZE;

/// Length of the initiator and responder randoms.
pub const RANDOM_LENGTH: usize = 32;

/// `Ka` and `Ke` are each half of the transcript hash.
pub const SESSION_KEY_LENGTH: usize = HASH_LENGTH / 2;
pub const CONFIRMATION_KEY_LENGTH: usize = 16;

/// HKDF info used to expand `Ka` into `KcA || KcB`.
pub const CONFIRMATION_KEYS_INFO: &[u8] = b"ConfirmationKeys";

//=================================[Sessions]==================================//

pub const SESSION_ID_LENGTH: usize = 8;

/// Passcode id sent in the parameter request.
pub const DEFAULT_PASSCODE_ID: u16 = 1;

/// Length of a stored verifier record: `w0 || L`.
pub const VERIFIER_LENGTH: usize = CRYPTO_GROUP_SIZE_BYTES + POINT_LENGTH;

//=================================[Passcodes]=================================//

/// Passcodes are encoded as 4 little-endian bytes before derivation.
pub const PASSCODE_LENGTH: usize = 4;

pub const MIN_PASSCODE: u32 = 0x0000_0001;
pub const MAX_PASSCODE: u32 = 0x05F5_E0FE; // 99 999 998

/// Passcodes that must never be used as a setup code.
pub const INVALID_PASSCODES: [u32; 12] = [
    0, 11111111, 22222222, 33333333, 44444444, 55555555, 66666666, 77777777, 88888888, 99999999,
    12345678, 87654321,
];
