//! Helpers shared by the exchange engine and the session state machines.

use colored::Colorize;
use hmac::Hmac;
use rand_core::RngCore;
use sha2::Sha256;

use crate::constants::SESSION_ID_LENGTH;

pub(crate) mod ct;
pub(crate) mod transcript;

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Fresh random identifier for one side of a pairing session.
pub fn new_session_id() -> String {
    let mut id = [0_u8; SESSION_ID_LENGTH];
    rand::thread_rng().fill_bytes(&mut id);
    hex::encode(id)
}

/// Hex encode public bytes for logging, tinted by their first three bytes so
/// that matching values are easy to spot across client and server logs.
pub(crate) fn colorize(b: impl AsRef<[u8]>) -> String {
    let id = b.as_ref();
    if id.len() < 3 {
        return hex::encode(id);
    }
    let r = id[0];
    let g = id[1];
    let b = id[2];
    hex::encode(id).truecolor(r, g, b).to_string()
}
