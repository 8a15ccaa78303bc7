//! Pair one client with one server and print the agreed key.

use anyhow::{Context, Result};
use clap::Parser;
use pase::{DefaultProvider, PaseClient, PaseServer, PbkdfParameters};
use pase_tools::logging::init_logging;

/// Run a single PASE pairing in-process
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Passcode the server is set up with
    #[arg(long, default_value_t = 123456)]
    server_passcode: u32,

    /// Passcode the client pairs with. Defaults to the server's.
    #[arg(long)]
    client_passcode: Option<u32>,

    /// PBKDF salt, hex encoded
    #[arg(long, default_value_t = String::from("01020304"))]
    salt: String,

    /// PBKDF iteration count
    #[arg(long, default_value_t = 1000)]
    iterations: u32,

    /// Log Level (ERROR/WARN/INFO/DEBUG/TRACE)
    #[arg(long, default_value_t = String::from("INFO"))]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let salt = hex::decode(&args.salt).context("salt must be hex")?;
    let params = PbkdfParameters::new(args.iterations, salt).context("invalid PBKDF parameters")?;
    let provider = DefaultProvider::shared();

    let mut server = PaseServer::new(provider.clone(), args.server_passcode, params.clone());
    server.prepare().await.context("preparing server")?;

    let mut client = PaseClient::new(provider);
    let passcode = args.client_passcode.unwrap_or(args.server_passcode);
    let client_key = client
        .initiate_pairing(passcode, &params, &mut server)
        .await
        .context("pairing failed")?;

    let server_key = server
        .session_key()
        .context("server did not reach the paired state")?;
    println!("client Ke: {}", hex::encode(*client_key));
    println!("server Ke: {}", hex::encode(*server_key));
    anyhow::ensure!(*client_key == *server_key, "session keys differ");
    Ok(())
}
