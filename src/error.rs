//! Error types for the stream relay

use crate::client::ClientError;
use crate::sink::SinkError;
use thiserror::Error;

/// Main error type for relay operations
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No shard iterator issued for shard {shard_id} of stream {stream_arn}")]
    IteratorUnavailable {
        stream_arn: String,
        shard_id: String,
    },

    #[error("Provider response missing the change record batch")]
    MissingRecords,

    #[error("Provider response missing the next shard iterator")]
    MissingNextIterator,

    #[error("Stream API error: {0}")]
    Client(#[from] ClientError),

    #[error("Event delivery failed: {0}")]
    Sink(#[from] SinkError),

    #[error("Shutdown requested")]
    Shutdown,
}

/// Result type for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let client_err = ClientError::Api("connection refused".to_string());
        let relay_err: RelayError = client_err.into();
        assert!(matches!(relay_err, RelayError::Client(_)));

        let sink_err = SinkError::Invocation("exit status: 1".to_string());
        let relay_err: RelayError = sink_err.into();
        assert!(matches!(relay_err, RelayError::Sink(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = RelayError::IteratorUnavailable {
            stream_arn: "arn:aws:dynamodb:local:000:table/orders/stream/1".to_string(),
            shard_id: "shardId-000001".to_string(),
        };
        assert!(err.to_string().contains("shardId-000001"));
        assert!(err.to_string().contains("orders"));

        let err = RelayError::Config("TABLE_NAME is required".to_string());
        assert!(err.to_string().contains("TABLE_NAME"));

        let err = RelayError::MissingNextIterator;
        assert!(err.to_string().contains("next shard iterator"));
    }
}
