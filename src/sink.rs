//! Delivery of record batches into a locally invoked function

use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::RelayConfig;
use crate::event::{ChangeRecord, EventEnvelope};

/// Errors raised while staging or delivering a batch.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to stage event file: {0}")]
    Stage(#[source] io::Error),

    #[error("failed to spawn invocation command: {0}")]
    Spawn(#[source] io::Error),

    #[error("invocation failed: {0}")]
    Invocation(String),

    #[error("failed to serialize event envelope: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Destination for non-empty record batches.
///
/// The poll loop's ordering and error semantics are defined against this
/// trait, so the loop can be exercised with a recording fake instead of a
/// real invocation tool.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn deliver(&self, records: &[ChangeRecord]) -> Result<(), SinkError>;
}

/// Stages each batch as a JSON envelope on disk and hands it to
/// `sam local invoke`.
///
/// The child process inherits this process's stdout and stderr so the
/// function's output lands on the operator's console. A non-zero exit is a
/// delivery failure; batches are never retried.
pub struct SamLocalSink {
    config: RelayConfig,
}

impl SamLocalSink {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Write the envelope to the fixed staging path.
    ///
    /// The previous file is removed first; the staging path holds at most
    /// one complete envelope at a time.
    async fn stage(&self, records: &[ChangeRecord]) -> Result<(), SinkError> {
        match fs::remove_file(&self.config.event_file).await {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(SinkError::Stage(err)),
        }

        let envelope = serde_json::to_vec(&EventEnvelope { records })?;
        fs::write(&self.config.event_file, envelope)
            .await
            .map_err(SinkError::Stage)
    }

    fn build_command(&self) -> Command {
        let mut command = Command::new(&self.config.sam_executable);
        command
            .arg("local")
            .arg("invoke")
            .arg("--docker-network")
            .arg(&self.config.docker_network)
            .arg("--docker-volume-basedir")
            .arg(&self.config.volume_basedir)
            .arg("--container-host")
            .arg(&self.config.container_host)
            .arg("--container-host-interface")
            .arg(&self.config.container_host_interface);

        if let Some(region) = &self.config.aws_region {
            command.arg("--region").arg(region);
        }

        command
            .arg("--env-vars")
            .arg(&self.config.env_file)
            .arg("--template")
            .arg(&self.config.template_file)
            .arg("--event")
            .arg(&self.config.event_file)
            .arg(&self.config.function_name);

        command
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        command
    }
}

#[async_trait]
impl EventSink for SamLocalSink {
    async fn deliver(&self, records: &[ChangeRecord]) -> Result<(), SinkError> {
        self.stage(records).await?;

        info!(
            records = records.len(),
            function = %self.config.function_name,
            "Invoking local function"
        );

        let status = self
            .build_command()
            .status()
            .await
            .map_err(SinkError::Spawn)?;

        if !status.success() {
            return Err(SinkError::Invocation(status.to_string()));
        }

        debug!(function = %self.config.function_name, "Local invocation completed");
        Ok(())
    }
}
