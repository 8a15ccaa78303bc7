//! Time `w0` lookups in a precomputed table for random passcodes.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use pase::{passcode, spake2p::compute_w0_w1, DefaultProvider, PbkdfParameters};
use pase_tools::{cost::TimingSummary, logging::init_logging, table::find_passcode_in_file};
use tracing::info;

/// Median and 95% interval of table lookup times
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Table written by build-table with the same salt and iterations
    #[arg(short, long, default_value_t = String::from("table.csv"))]
    table: String,

    /// PBKDF salt, used as raw bytes
    #[arg(long, default_value_t = String::from("asalt"))]
    salt: String,

    /// PBKDF iteration count
    #[arg(long, default_value_t = 1000)]
    iterations: u32,

    /// Lookups to time
    #[arg(long, default_value_t = 10)]
    rounds: usize,

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

    let mut timings = Vec::with_capacity(args.rounds);
    for round in 1..=args.rounds {
        let target = passcode::random(&mut rand::thread_rng());
        let (w0, _) = compute_w0_w1(&provider, &params, target).await?;
        info!("round {round}: passcode {target:08}, w0 {}", w0.to_decimal());

        let started = Instant::now();
        let found = find_passcode_in_file(&args.table, &w0).await?;
        timings.push(started.elapsed());

        match found {
            Some(p) => info!("round {round}: found passcode {p:08}"),
            None => info!("round {round}: passcode not in table"),
        }
    }

    match TimingSummary::from_samples(timings) {
        Some(summary) => println!("{summary}"),
        None => println!("no lookups timed"),
    }
    Ok(())
}
