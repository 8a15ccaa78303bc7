//! Time filling a table of derivation outputs for a passcode range.

use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use pase::passcode;
use pase_tools::{
    cost::{argon2_params, empty_table, fill_table, Kdf},
    logging::init_logging,
};
use rand::RngCore;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KdfKind {
    Pbkdf2,
    Argon2id,
}

/// Measure the time to derive outputs for every valid passcode in a range
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Derivation function
    #[arg(long, value_enum, default_value_t = KdfKind::Argon2id)]
    kdf: KdfKind,

    /// PBKDF2 iteration count
    #[arg(long, default_value_t = 1000)]
    iterations: u32,

    /// Argon2id memory in KiB
    #[arg(long, default_value_t = 7168)]
    memory_kib: u32,

    /// Argon2id passes
    #[arg(long, default_value_t = 5)]
    passes: u32,

    /// Argon2id lanes
    #[arg(long, default_value_t = 1)]
    lanes: u32,

    /// First passcode
    #[arg(long, default_value_t = passcode::MIN)]
    start: u32,

    /// Last passcode (inclusive)
    #[arg(long, default_value_t = passcode::MAX)]
    end: u32,

    /// Entries held in memory at once
    #[arg(long, default_value_t = 1_000_000)]
    chunk: usize,

    /// Log Level (ERROR/WARN/INFO/DEBUG/TRACE)
    #[arg(long, default_value_t = String::from("INFO"))]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;
    if args.chunk == 0 {
        bail!("--chunk must be positive");
    }

    let kdf = match args.kdf {
        KdfKind::Pbkdf2 => Kdf::Pbkdf2 {
            iterations: args.iterations,
        },
        KdfKind::Argon2id => {
            Kdf::Argon2id(argon2_params(args.memory_kib, args.passes, args.lanes)?)
        }
    };

    let mut salt = [0_u8; 32];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut passcodes = (args.start..=args.end).filter(|p| passcode::is_valid(*p));
    info!("filling {}..={} with {kdf}", args.start, args.end);

    let started = Instant::now();
    let mut total = 0_usize;
    loop {
        let mut table = empty_table(passcodes.by_ref().take(args.chunk));
        if table.is_empty() {
            break;
        }
        fill_table(&mut table, &salt, &kdf)?;
        total += table.len();
        debug!("{total} entries filled after {:?}", started.elapsed());
    }
    let elapsed = started.elapsed();

    info!("{total} entries filled with {kdf} in {elapsed:?}");
    println!("{}", elapsed.as_secs());
    Ok(())
}
