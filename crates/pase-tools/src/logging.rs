use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, prelude::*};

/// Install the console subscriber at `level` (ERROR/WARN/INFO/DEBUG/TRACE).
pub fn init_logging(level: &str) -> Result<()> {
    let level = Level::from_str(level).with_context(|| format!("bad log level {level:?}"))?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::from_level(level));

    tracing_subscriber::registry().with(console_layer).try_init()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_unknown_level() {
        assert!(init_logging("LOUD").is_err());
    }
}
