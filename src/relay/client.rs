use std::time::Duration;

use thiserror::Error;

use crate::config::RelayConfig;
use crate::scanner::SweepBuffer;
use crate::telemetry::CommandBuffer;

use super::payload::{CommandEnvelope, SweepPayload};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("transmission failed: {0}")]
    Transmission(#[from] reqwest::Error),
}

/// Embedded-side HTTP relay. Both calls block; they run on the scan loop
/// thread between passes, so a transmission never overlaps sample
/// collection.
pub struct RelayClient {
    http: reqwest::blocking::Client,
    sweep_url: String,
    command_url: String,
}

impl RelayClient {
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            http,
            sweep_url: config.sweep_url(),
            command_url: config.command_url(),
        })
    }

    /// Send a completed pass to the host. Failures are the caller's to log
    /// and discard: a stale sweep is worthless by the time a retry would
    /// land.
    pub fn publish_sweep(&self, sweep: &SweepBuffer) -> Result<(), RelayError> {
        self.http
            .post(&self.sweep_url)
            .json(&SweepPayload::from_sweep(sweep))
            .send()?
            .error_for_status()?;
        Ok(())
    }

    /// Poll the host for a fresh command. `None` when there is nothing new;
    /// a malformed or unreachable response is an error and leaves the
    /// caller's previous command state untouched.
    pub fn fetch_command(&self) -> Result<Option<CommandBuffer>, RelayError> {
        let envelope: CommandEnvelope = self
            .http
            .get(&self.command_url)
            .send()?
            .error_for_status()?
            .json()?;

        if envelope.rpi_data.is_empty() {
            Ok(None)
        } else {
            Ok(Some(CommandBuffer(envelope.rpi_data)))
        }
    }
}
