//! Test utilities and mock implementations for exercising the relay


use aws_sdk_dynamodbstreams::types::{Shard, Stream};
use serde_json::json;

use crate::client::RecordPage;
use crate::event::ChangeRecord;

/// Helper functions for creating test data
pub struct TestUtils;

impl TestUtils {
    /// Stream entry carrying the given ARN.
    pub fn create_test_stream(stream_arn: &str) -> Stream {
        Stream::builder()
            .stream_arn(stream_arn)
            .table_name("orders")
            .build()
    }

    /// Stream entry without an ARN, as a misconfigured provider might return.
    pub fn create_unnamed_stream() -> Stream {
        Stream::builder().table_name("orders").build()
    }

    /// Shard entry with the given id.
    pub fn create_test_shard(shard_id: &str) -> Shard {
        Shard::builder().shard_id(shard_id).build()
    }

    /// One change record in the relayed JSON shape.
    pub fn create_test_record(event_id: &str) -> ChangeRecord {
        json!({
            "eventID": event_id,
            "eventName": "INSERT",
            "dynamodb": {
                "SequenceNumber": event_id,
                "StreamViewType": "NEW_AND_OLD_IMAGES",
            }
        })
    }

    /// A vector of change records with distinct event ids.
    pub fn create_test_records(count: usize) -> Vec<ChangeRecord> {
        (0..count)
            .map(|i| Self::create_test_record(&format!("event-{}", i)))
            .collect()
    }

    /// Record page carrying `records` and a next iterator token.
    pub fn record_page(records: Vec<ChangeRecord>, next_iterator: &str) -> RecordPage {
        RecordPage {
            records: Some(records),
            next_shard_iterator: Some(next_iterator.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_stream() {
        let stream = TestUtils::create_test_stream("stream-arn-1");
        assert_eq!(stream.stream_arn(), Some("stream-arn-1"));

        let unnamed = TestUtils::create_unnamed_stream();
        assert_eq!(unnamed.stream_arn(), None);
    }

    #[test]
    fn test_create_test_records() {
        let records = TestUtils::create_test_records(3);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["eventID"], "event-0");
        assert_eq!(records[2]["eventID"], "event-2");
    }

    #[test]
    fn test_record_page() {
        let page = TestUtils::record_page(TestUtils::create_test_records(1), "iterator-2");
        assert_eq!(page.records.as_ref().map(Vec::len), Some(1));
        assert_eq!(page.next_shard_iterator.as_deref(), Some("iterator-2"));
    }
}
