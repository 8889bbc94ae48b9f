//! Tail a DynamoDB change stream and replay each record batch into a locally
//! invoked Lambda function.
//!
//! The relay resolves the single stream and shard attached to a table, mints
//! a shard iterator at the latest position, then polls on a fixed interval.
//! Every non-empty batch is staged as a `{"Records": [...]}` envelope and
//! handed to `sam local invoke`, preserving provider order. Iterator
//! expiration is recovered by minting a replacement; protocol violations and
//! sink failures stop the relay.
//!
//! ```rust,no_run
//! use dynamo_stream_relay::{RelayConfig, SamLocalSink, StreamRelay};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RelayConfig::from_env()?;
//!     let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
//!     let client = aws_sdk_dynamodbstreams::Client::new(&sdk_config);
//!
//!     let sink = SamLocalSink::new(&config);
//!     let relay = StreamRelay::new(config, client, sink);
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     relay.run(shutdown_rx).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod fetch;
pub mod iterator;
pub mod locator;
pub mod relay;
pub mod sink;

// Make test utilities available for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test;

pub use client::{ClientError, RecordPage, StreamsClientTrait};
pub use config::RelayConfig;
pub use error::{RelayError, Result};
pub use event::{ChangeRecord, EventEnvelope};
pub use fetch::FetchOutcome;
pub use iterator::ShardIterator;
pub use locator::ShardLocation;
pub use relay::StreamRelay;
pub use sink::{EventSink, SamLocalSink, SinkError};
