use async_trait::async_trait;
use aws_sdk_dynamodbstreams::types::{Shard, ShardIteratorType, Stream};
use aws_sdk_dynamodbstreams::Client;
use aws_smithy_types::error::display::DisplayErrorContext;
use thiserror::Error;

use crate::event::{record_to_event, ChangeRecord};

/// Errors surfaced by the stream provider.
///
/// Iterator expiration is the one condition the poll loop recovers from, so
/// it gets its own variant instead of being folded into the generic case.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("shard iterator expired")]
    ExpiredIterator,

    #[error("{0}")]
    Api(String),
}

/// One page of change records from a `GetRecords` call.
///
/// Both fields stay optional: the provider contract requires each to be
/// present on success, and the fetcher treats absence as a protocol
/// violation.
#[derive(Debug, Default)]
pub struct RecordPage {
    pub records: Option<Vec<ChangeRecord>>,
    pub next_shard_iterator: Option<String>,
}

/// The four stream-provider operations the relay consumes.
#[async_trait]
pub trait StreamsClientTrait: Send + Sync {
    /// Streams currently attached to the named table.
    async fn list_streams(&self, table_name: &str) -> Result<Vec<Stream>, ClientError>;

    /// Shards of the given stream.
    async fn describe_stream(&self, stream_arn: &str) -> Result<Vec<Shard>, ClientError>;

    /// Mint an iterator positioned at LATEST. `None` means the provider
    /// declined to issue one.
    async fn get_shard_iterator(
        &self,
        stream_arn: &str,
        shard_id: &str,
    ) -> Result<Option<String>, ClientError>;

    /// Fetch one page of records. Expiration of the iterator maps to
    /// [`ClientError::ExpiredIterator`].
    async fn get_records(
        &self,
        iterator: &str,
        limit: Option<i32>,
    ) -> Result<RecordPage, ClientError>;
}

#[async_trait]
impl StreamsClientTrait for Client {
    async fn list_streams(&self, table_name: &str) -> Result<Vec<Stream>, ClientError> {
        let response = self
            .list_streams()
            .table_name(table_name)
            .send()
            .await
            .map_err(|err| ClientError::Api(format!("{}", DisplayErrorContext(&err))))?;
        Ok(response.streams.unwrap_or_default())
    }

    async fn describe_stream(&self, stream_arn: &str) -> Result<Vec<Shard>, ClientError> {
        let response = self
            .describe_stream()
            .stream_arn(stream_arn)
            .send()
            .await
            .map_err(|err| ClientError::Api(format!("{}", DisplayErrorContext(&err))))?;
        Ok(response
            .stream_description
            .and_then(|description| description.shards)
            .unwrap_or_default())
    }

    async fn get_shard_iterator(
        &self,
        stream_arn: &str,
        shard_id: &str,
    ) -> Result<Option<String>, ClientError> {
        let response = self
            .get_shard_iterator()
            .stream_arn(stream_arn)
            .shard_id(shard_id)
            .shard_iterator_type(ShardIteratorType::Latest)
            .send()
            .await
            .map_err(|err| ClientError::Api(format!("{}", DisplayErrorContext(&err))))?;
        Ok(response.shard_iterator)
    }

    async fn get_records(
        &self,
        iterator: &str,
        limit: Option<i32>,
    ) -> Result<RecordPage, ClientError> {
        match self
            .get_records()
            .shard_iterator(iterator)
            .set_limit(limit)
            .send()
            .await
        {
            Ok(response) => Ok(RecordPage {
                records: response
                    .records
                    .map(|records| records.iter().map(record_to_event).collect()),
                next_shard_iterator: response.next_shard_iterator,
            }),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_expired_iterator_exception() {
                    return Err(ClientError::ExpiredIterator);
                }
                Err(ClientError::Api(format!(
                    "{}",
                    DisplayErrorContext(&service_err)
                )))
            }
        }
    }
}
