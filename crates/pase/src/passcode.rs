//! Setup passcode rules and encoding.

use rand::Rng;

use crate::constants::{INVALID_PASSCODES, MAX_PASSCODE, MIN_PASSCODE, PASSCODE_LENGTH};

pub use crate::constants::{MAX_PASSCODE as MAX, MIN_PASSCODE as MIN};

/// Whether `passcode` may be used as a setup code.
pub fn is_valid(passcode: u32) -> bool {
    (MIN_PASSCODE..=MAX_PASSCODE).contains(&passcode) && !INVALID_PASSCODES.contains(&passcode)
}

/// All valid passcodes in ascending order.
pub fn valid_passcodes() -> impl Iterator<Item = u32> {
    (MIN_PASSCODE..=MAX_PASSCODE).filter(|p| !INVALID_PASSCODES.contains(p))
}

/// A uniformly random valid passcode.
pub fn random<R: Rng>(rng: &mut R) -> u32 {
    loop {
        let p = rng.gen_range(MIN_PASSCODE..=MAX_PASSCODE);
        if is_valid(p) {
            return p;
        }
    }
}

/// Byte form fed to PBKDF2.
pub fn to_bytes(passcode: u32) -> [u8; PASSCODE_LENGTH] {
    passcode.to_le_bytes()
}
