//! The precomputed passcode table.
//!
//! A text file with the header `passcode,w0,w1` followed by one row per
//! passcode, every value a decimal integer:
//!
//! ```txt
//! passcode,w0,w1
//! 1,8457...,1029...
//! 2,3378...,9912...
//! ```
//!
//! Lookups scan the rows in order for a matching `w0`.

use std::path::Path;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use pase::{
    crypto::Provider,
    spake2p::{compute_w0_w1, PbkdfParameters},
    Scalar,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info};

pub const TABLE_HEADER: &str = "passcode,w0,w1";

/// Log progress every this many rows.
const PROGRESS_INTERVAL: u64 = 100_000;

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub passcode: u32,
    pub w0: Scalar,
    pub w1: Scalar,
}

impl TableRow {
    pub async fn derive(
        provider: &Provider,
        params: &PbkdfParameters,
        passcode: u32,
    ) -> Result<Self> {
        let (w0, w1) = compute_w0_w1(provider, params, passcode)
            .await
            .with_context(|| format!("deriving w0/w1 for passcode {passcode}"))?;
        Ok(Self { passcode, w0, w1 })
    }

    pub fn to_line(&self) -> String {
        format!(
            "{},{},{}",
            self.passcode,
            self.w0.to_decimal(),
            self.w1.to_decimal()
        )
    }

    /// Parse a data row. Returns `None` for anything that is not three
    /// comma separated decimal integers.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.trim().split(',');
        let passcode = fields.next()?.parse().ok()?;
        let w0 = Scalar::from_decimal(fields.next()?)?;
        let w1 = Scalar::from_decimal(fields.next()?)?;
        if fields.next().is_some() {
            return None;
        }
        Some(Self { passcode, w0, w1 })
    }
}

/// Derive a row for every passcode in `passcodes` and write the table to
/// `out`, keeping `concurrency` derivations in flight. Rows are written in
/// the order of `passcodes`. Returns the number of rows written.
pub async fn build_table<I, W>(
    provider: &Provider,
    params: &PbkdfParameters,
    passcodes: I,
    concurrency: usize,
    out: W,
) -> Result<u64>
where
    I: IntoIterator<Item = u32>,
    W: AsyncWrite + Unpin,
{
    let mut out = BufWriter::new(out);
    out.write_all(TABLE_HEADER.as_bytes()).await?;
    out.write_all(b"\n").await?;

    let mut rows = stream::iter(passcodes)
        .map(|passcode| {
            let provider = provider.clone();
            let params = params.clone();
            async move { TableRow::derive(&provider, &params, passcode).await }
        })
        .buffered(concurrency.max(1));

    let mut written = 0_u64;
    while let Some(row) = rows.next().await {
        let row = row?;
        out.write_all(row.to_line().as_bytes()).await?;
        out.write_all(b"\n").await?;
        written += 1;
        if written % PROGRESS_INTERVAL == 0 {
            info!("{written} rows written, last passcode {}", row.passcode);
        }
    }
    out.flush().await?;

    debug!("table complete with {written} rows");
    Ok(written)
}

/// [`build_table`] into a newly created file at `path`.
pub async fn build_table_file<I>(
    provider: &Provider,
    params: &PbkdfParameters,
    passcodes: I,
    concurrency: usize,
    path: impl AsRef<Path>,
) -> Result<u64>
where
    I: IntoIterator<Item = u32>,
{
    let path = path.as_ref();
    let file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("creating {}", path.display()))?;
    build_table(provider, params, passcodes, concurrency, file).await
}

/// Scan the table for a row whose `w0` matches, skipping the header line.
/// Returns the passcode of the first match.
///
/// `w0` fields are compared as integers, so `007` matches 7. A row whose
/// passcode or `w0` does not parse ends the scan with an error; blank lines
/// are ignored.
pub async fn find_passcode_by_w0<R>(table: R, w0: &Scalar) -> Result<Option<u32>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = table.lines();

    // header
    if lines.next_line().await?.is_none() {
        return Ok(None);
    }

    let mut line_no = 1_u64;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split(',');
        let passcode = fields.next().unwrap_or_default().trim();
        let row_w0 = fields
            .next()
            .and_then(Scalar::from_decimal)
            .with_context(|| format!("malformed w0 on line {line_no}: {line:?}"))?;
        if &row_w0 == w0 {
            let passcode = passcode
                .parse()
                .with_context(|| format!("malformed passcode on line {line_no}: {line:?}"))?;
            return Ok(Some(passcode));
        }
    }
    Ok(None)
}

/// [`find_passcode_by_w0`] over the file at `path`.
pub async fn find_passcode_in_file(path: impl AsRef<Path>, w0: &Scalar) -> Result<Option<u32>> {
    let path = path.as_ref();
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("opening {}", path.display()))?;
    find_passcode_by_w0(BufReader::new(file), w0).await
}
