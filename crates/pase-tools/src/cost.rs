//! What it costs an attacker to fill a precomputed table.
//!
//! Each table entry holds the `w0 || w1` derivation output for one passcode.
//! The derivation is PBKDF2-HMAC-SHA256 as used by pairing, or Argon2id for
//! comparison. Filling runs on all cores.

use std::{fmt, time::Duration};

use anyhow::{anyhow, bail, Result};
use argon2::{Algorithm, Argon2, Params, Version};
use pase::{constants::CRYPTO_W_SIZE_BYTES, passcode, Scalar};
use rayon::prelude::*;
use sha2::Sha256;

/// Derivation output per passcode, `w0 || w1` before reduction.
pub const OUTPUT_LENGTH: usize = 2 * CRYPTO_W_SIZE_BYTES;

/// PBKDF2 iteration counts measured by the benchmarks.
pub const PBKDF2_ITERATION_COUNTS: [u32; 5] = [1_000, 10_000, 100_000, 600_000, 1_000_000];

/// Argon2id with 7 MiB of memory, 5 passes and a single lane.
pub fn argon2id_params() -> Result<Params> {
    argon2_params(7168, 5, 1)
}

pub fn argon2_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Params> {
    Params::new(m_cost, t_cost, p_cost, Some(OUTPUT_LENGTH))
        .map_err(|e| anyhow!("argon2id parameters: {e}"))
}

/// A passcode derivation function.
#[derive(Clone)]
pub enum Kdf {
    Pbkdf2 { iterations: u32 },
    Argon2id(Params),
}

impl Kdf {
    /// Derive the output for `passcode` into `out`.
    pub fn hash(&self, passcode: u32, salt: &[u8], out: &mut [u8; OUTPUT_LENGTH]) -> Result<()> {
        let password = passcode::to_bytes(passcode);
        match self {
            Kdf::Pbkdf2 { iterations: 0 } => bail!("PBKDF2 needs at least one iteration"),
            Kdf::Pbkdf2 { iterations } => {
                pbkdf2::pbkdf2_hmac::<Sha256>(&password, salt, *iterations, out);
            }
            Kdf::Argon2id(params) => {
                Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone())
                    .hash_password_into(&password, salt, out)
                    .map_err(|e| anyhow!("argon2id for passcode {passcode}: {e}"))?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Kdf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kdf::Pbkdf2 { iterations } => write!(f, "pbkdf2_{iterations}"),
            Kdf::Argon2id(p) => {
                write!(f, "argon2id_m{}_t{}_p{}", p.m_cost(), p.t_cost(), p.p_cost())
            }
        }
    }
}

/// One passcode and its derivation output.
#[derive(Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub passcode: u32,
    pub output: [u8; OUTPUT_LENGTH],
}

impl TableEntry {
    /// The `w0` this entry's output reduces to.
    pub fn w0(&self) -> Scalar {
        Scalar::from_be_bytes_reduced(&self.output[..CRYPTO_W_SIZE_BYTES])
    }
}

impl fmt::Debug for TableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableEntry({}, {})", self.passcode, hex::encode(self.output))
    }
}

/// Entries for `passcodes` with zeroed outputs.
pub fn empty_table(passcodes: impl IntoIterator<Item = u32>) -> Vec<TableEntry> {
    passcodes
        .into_iter()
        .map(|passcode| TableEntry {
            passcode,
            output: [0_u8; OUTPUT_LENGTH],
        })
        .collect()
}

/// Derive every entry's output in parallel. Stops at the first failure.
pub fn fill_table(table: &mut [TableEntry], salt: &[u8], kdf: &Kdf) -> Result<()> {
    table
        .par_iter_mut()
        .try_for_each(|entry| kdf.hash(entry.passcode, salt, &mut entry.output))
}

/// Median and 95% interval of a set of timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSummary {
    pub samples: usize,
    pub median: Duration,
    pub lower: Duration,
    pub upper: Duration,
}

impl TimingSummary {
    /// `None` when there are no samples.
    pub fn from_samples(mut samples: Vec<Duration>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        samples.sort_unstable();
        let len = samples.len();
        let mid = len / 2;
        let median = if len % 2 == 1 {
            samples[mid]
        } else {
            (samples[mid - 1] + samples[mid]) / 2
        };
        // 2.5th and 97.5th percentiles by rank
        let lower = samples[len * 25 / 1000];
        let upper = samples[(len * 975).div_ceil(1000) - 1];
        Some(Self {
            samples: len,
            median,
            lower,
            upper,
        })
    }
}

impl fmt::Display for TimingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "median {:.2?} over {} runs, 95% interval [{:.2?}, {:.2?}]",
            self.median, self.samples, self.lower, self.upper
        )
    }
}
