//! Shard iterator acquisition and replacement

use tracing::{debug, info};

use crate::client::StreamsClientTrait;
use crate::error::{RelayError, Result};
use crate::locator::ShardLocation;

/// Opaque position token for reading a shard.
///
/// Exactly one iterator is current at any time. It is replaced after every
/// successful fetch and discarded outright on expiration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardIterator(String);

impl ShardIterator {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Mint an iterator at the provider's LATEST position.
///
/// Records written before the mint are never seen. A provider that declines
/// to issue an iterator indicates a broken environment, not a transient
/// condition, so the error is fatal.
pub async fn acquire_latest<C>(client: &C, location: &ShardLocation) -> Result<ShardIterator>
where
    C: StreamsClientTrait,
{
    let token = client
        .get_shard_iterator(&location.stream_arn, &location.shard_id)
        .await?;

    match token {
        Some(token) => {
            debug!(
                shard_id = %location.shard_id,
                "Acquired shard iterator at latest position"
            );
            Ok(ShardIterator::new(token))
        }
        None => Err(RelayError::IteratorUnavailable {
            stream_arn: location.stream_arn.clone(),
            shard_id: location.shard_id.clone(),
        }),
    }
}

/// Replace an expired iterator.
///
/// Same LATEST semantics as the initial mint; records produced between the
/// expiration and the replacement are skipped, not recovered.
pub async fn reacquire<C>(client: &C, location: &ShardLocation) -> Result<ShardIterator>
where
    C: StreamsClientTrait,
{
    info!(
        shard_id = %location.shard_id,
        "Shard iterator expired, acquiring replacement at latest position"
    );
    acquire_latest(client, location).await
}
