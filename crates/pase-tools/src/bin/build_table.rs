//! Write the precomputed `passcode,w0,w1` table for one set of PBKDF
//! parameters.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use pase::{passcode, DefaultProvider, PbkdfParameters};
use pase_tools::{logging::init_logging, table::build_table_file};
use tracing::info;

/// Precompute w0 and w1 for a range of passcodes
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output file
    #[arg(short, long, default_value_t = String::from("table.csv"))]
    output: String,

    /// PBKDF salt, used as raw bytes
    #[arg(long, default_value_t = String::from("asalt"))]
    salt: String,

    /// PBKDF iteration count
    #[arg(long, default_value_t = 1000)]
    iterations: u32,

    /// First passcode
    #[arg(long, default_value_t = passcode::MIN)]
    start: u32,

    /// Last passcode (inclusive)
    #[arg(long, default_value_t = passcode::MAX)]
    end: u32,

    /// Leave out passcodes that can never be used as setup codes
    #[arg(long, default_value_t = false)]
    skip_invalid: bool,

    /// Derivations kept in flight at once
    #[arg(long, default_value_t = 8)]
    concurrency: usize,

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

    let skip_invalid = args.skip_invalid;
    let passcodes =
        (args.start..=args.end).filter(move |p| !skip_invalid || passcode::is_valid(*p));

    info!(
        "building {} for passcodes {}..={} with {params:?}",
        args.output, args.start, args.end
    );
    let started = Instant::now();
    let rows = build_table_file(&provider, &params, passcodes, args.concurrency, &args.output)
        .await
        .with_context(|| format!("building {}", args.output))?;

    info!("{rows} rows written in {:?}", started.elapsed());
    Ok(())
}
