//! Single-page record fetch with a tagged outcome

use crate::client::{ClientError, StreamsClientTrait};
use crate::error::{RelayError, Result};
use crate::event::ChangeRecord;
use crate::iterator::ShardIterator;

/// Result of one poll-cycle fetch.
///
/// Expiration is a normal outcome here rather than an error: the poll loop
/// recovers from it by minting a replacement iterator, and everything else
/// it sees from this module is fatal.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Records in provider order plus the iterator for the next cycle.
    /// An empty batch is valid and means "nothing new this cycle".
    Batch {
        records: Vec<ChangeRecord>,
        next_iterator: ShardIterator,
    },
    /// The iterator lapsed before this fetch.
    Expired,
}

/// Fetch one page of records using `iterator`.
///
/// A successful provider response must carry both the record list and the
/// next iterator. Absence of either is a protocol violation and fails the
/// relay instead of being defaulted away.
pub async fn fetch_batch<C>(
    client: &C,
    iterator: &ShardIterator,
    limit: Option<i32>,
) -> Result<FetchOutcome>
where
    C: StreamsClientTrait,
{
    let page = match client.get_records(iterator.as_str(), limit).await {
        Ok(page) => page,
        Err(ClientError::ExpiredIterator) => return Ok(FetchOutcome::Expired),
        Err(err) => return Err(RelayError::Client(err)),
    };

    let next_iterator = match page.next_shard_iterator {
        Some(token) => ShardIterator::new(token),
        None => return Err(RelayError::MissingNextIterator),
    };

    let records = match page.records {
        Some(records) => records,
        None => return Err(RelayError::MissingRecords),
    };

    Ok(FetchOutcome::Batch {
        records,
        next_iterator,
    })
}
