use anyhow::{bail, Result};
use std::time::Duration;

use crate::cli::Cli;

/// Settings consumed by the assessment pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessConfig {
    pub grab_banners: bool,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub credential_timeout: Duration,
    pub concurrency: usize,
}

impl Default for AssessConfig {
    fn default() -> Self {
        Self {
            grab_banners: true,
            connect_timeout: Duration::from_secs(1),
            read_timeout: Duration::from_secs(1),
            credential_timeout: Duration::from_secs(2),
            concurrency: 32,
        }
    }
}

impl AssessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 || self.concurrency > 4096 {
            bail!("--concurrency must be between 1 and 4096");
        }
        if self.connect_timeout.is_zero() || self.read_timeout.is_zero() || self.credential_timeout.is_zero() {
            bail!("probe timeouts must be greater than zero");
        }
        Ok(())
    }
}

impl From<&Cli> for AssessConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            grab_banners: !cli.no_banner,
            connect_timeout: Duration::from_millis(cli.connect_timeout_ms),
            read_timeout: Duration::from_millis(cli.read_timeout_ms),
            credential_timeout: Duration::from_millis(cli.credential_timeout_ms),
            concurrency: cli.concurrency,
        }
    }
}
