//! Discovery of the table's change stream and its single shard
//!
//! The relay supports exactly one stream per table and exactly one shard per
//! stream. Anything else is an operator-configuration problem, reported as a
//! warning and retried by the caller instead of crashing the process.

use tracing::warn;

use crate::client::{ClientError, StreamsClientTrait};

/// The stream/shard pair the relay polls for its whole lifetime.
///
/// Resolved once at startup and never mutated; replacement iterators are
/// minted from these same identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardLocation {
    pub stream_arn: String,
    pub shard_id: String,
}

/// Resolve the change stream attached to `table_name`.
///
/// `Ok(None)` means the topology is not usable yet: no stream, several
/// streams, or a stream entry without an ARN.
pub async fn resolve_stream<C>(
    client: &C,
    table_name: &str,
) -> Result<Option<String>, ClientError>
where
    C: StreamsClientTrait,
{
    let mut streams = client.list_streams(table_name).await?;
    if streams.len() != 1 {
        warn!(
            table = %table_name,
            count = streams.len(),
            "Expected exactly one stream for table"
        );
        return Ok(None);
    }

    match streams.remove(0).stream_arn {
        Some(arn) => Ok(Some(arn)),
        None => {
            warn!(table = %table_name, "Stream entry has no ARN");
            Ok(None)
        }
    }
}

/// Resolve the single shard of `stream_arn`, with the same tri-state policy
/// as [`resolve_stream`].
pub async fn resolve_shard<C>(
    client: &C,
    stream_arn: &str,
) -> Result<Option<String>, ClientError>
where
    C: StreamsClientTrait,
{
    let mut shards = client.describe_stream(stream_arn).await?;
    if shards.len() != 1 {
        warn!(
            stream_arn = %stream_arn,
            count = shards.len(),
            "Expected exactly one shard in stream"
        );
        return Ok(None);
    }

    match shards.remove(0).shard_id {
        Some(id) => Ok(Some(id)),
        None => {
            warn!(stream_arn = %stream_arn, "Shard entry has no id");
            Ok(None)
        }
    }
}

/// Resolve stream and shard together. Shard discovery is skipped entirely
/// while the stream itself is unresolved.
pub async fn resolve<C>(
    client: &C,
    table_name: &str,
) -> Result<Option<ShardLocation>, ClientError>
where
    C: StreamsClientTrait,
{
    let stream_arn = match resolve_stream(client, table_name).await? {
        Some(arn) => arn,
        None => return Ok(None),
    };

    let shard_id = match resolve_shard(client, &stream_arn).await? {
        Some(id) => id,
        None => return Ok(None),
    };

    Ok(Some(ShardLocation {
        stream_arn,
        shard_id,
    }))
}
