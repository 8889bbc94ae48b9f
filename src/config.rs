//! Configuration loaded from the environment at startup

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{RelayError, Result};

const DEFAULT_CONTAINER_HOST: &str = "host.docker.internal";
const DEFAULT_CONTAINER_HOST_INTERFACE: &str = "0.0.0.0";
const DEFAULT_EVENT_FILE: &str = ".dynamodb-stream-event.json";
const DEFAULT_SAM_BIN: &str = "sam";
const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

/// Configuration for the stream relay
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Source table whose change stream is tailed
    pub table_name: String,
    /// Stream API endpoint override, e.g. a LocalStack URL
    pub aws_endpoint: Option<String>,
    /// Region override, forwarded to both the SDK and the invocation tool
    pub aws_region: Option<String>,
    /// SAM template describing the function under test
    pub template_file: PathBuf,
    /// Environment variable file passed to the invocation tool
    pub env_file: PathBuf,
    /// Docker volume base directory (the synthesized cdk.out path)
    pub volume_basedir: PathBuf,
    /// Logical name of the function to invoke
    pub function_name: String,
    /// Docker network the invocation container joins
    pub docker_network: String,
    /// Hostname the container uses to reach the host
    pub container_host: String,
    /// Interface the container binds for host communication
    pub container_host_interface: String,
    /// Fixed path where each batch envelope is staged
    pub event_file: PathBuf,
    /// Invocation tool binary
    pub sam_executable: String,
    /// Pause between poll cycles, also the bootstrap retry interval
    pub poll_interval: Duration,
    /// Optional per-fetch record limit (provider default when unset)
    pub batch_size: Option<i32>,
}

impl RelayConfig {
    /// Load configuration from environment variables and validate it.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            table_name: require("TABLE_NAME")?,
            aws_endpoint: env::var("AWS_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            template_file: require("SAM_TEMPLATE_FILE")?.into(),
            env_file: require("ENV_FILE")?.into(),
            volume_basedir: require("CDK_OUT_ABSOLUTE_PATH")?.into(),
            function_name: require("LAMBDA_FUNCTION_NAME")?,
            docker_network: require("DOCKER_NETWORK")?,
            container_host: env::var("CONTAINER_HOST")
                .unwrap_or_else(|_| DEFAULT_CONTAINER_HOST.to_string()),
            container_host_interface: env::var("CONTAINER_HOST_INTERFACE")
                .unwrap_or_else(|_| DEFAULT_CONTAINER_HOST_INTERFACE.to_string()),
            event_file: env::var("EVENT_FILE")
                .unwrap_or_else(|_| DEFAULT_EVENT_FILE.to_string())
                .into(),
            sam_executable: env::var("SAM_BIN").unwrap_or_else(|_| DEFAULT_SAM_BIN.to_string()),
            poll_interval: Duration::from_millis(
                env::var("POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            ),
            batch_size: env::var("BATCH_SIZE")
                .ok()
                .and_then(|value| value.parse().ok()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check settings that cannot be verified at parse time.
    pub fn validate(&self) -> Result<()> {
        if self.table_name.is_empty() {
            return Err(RelayError::Config("TABLE_NAME must not be empty".to_string()));
        }
        if self.function_name.is_empty() {
            return Err(RelayError::Config(
                "LAMBDA_FUNCTION_NAME must not be empty".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(RelayError::Config(
                "POLL_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }
        if let Some(limit) = self.batch_size {
            if !(1..=1000).contains(&limit) {
                return Err(RelayError::Config(format!(
                    "BATCH_SIZE must be between 1 and 1000, got {}",
                    limit
                )));
            }
        }
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            table_name: String::new(),
            aws_endpoint: None,
            aws_region: None,
            template_file: PathBuf::from("template.yaml"),
            env_file: PathBuf::from("env.json"),
            volume_basedir: PathBuf::from("."),
            function_name: String::new(),
            docker_network: String::new(),
            container_host: DEFAULT_CONTAINER_HOST.to_string(),
            container_host_interface: DEFAULT_CONTAINER_HOST_INTERFACE.to_string(),
            event_file: PathBuf::from(DEFAULT_EVENT_FILE),
            sam_executable: DEFAULT_SAM_BIN.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            batch_size: None,
        }
    }
}

fn require(name: &str) -> Result<String> {
    env::var(name).map_err(|_| RelayError::Config(format!("{} is required", name)))
}
