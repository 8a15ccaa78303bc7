//! Demonstration tooling built on the `pase` crate.
//!
//! - [`table`]: build and search the precomputed `passcode,w0,w1` table.
//! - [`attack`]: online brute force against live server sessions, and the
//!   offline lookup of a stolen verifier record in a precomputed table.
//! - [`cost`]: table fill cost under PBKDF2 and Argon2id, and lookup timing.

pub mod attack;
pub mod cost;
pub mod logging;
pub mod table;
