//! The poll loop driving discovery, fetch, and dispatch
//!
//! One cooperative task owns the whole lifecycle: resolve the topology,
//! mint an iterator at the latest position, then fetch/dispatch/pause until
//! a fatal error or a shutdown signal. The shutdown channel is consulted at
//! every suspension point so the host can stop the relay cleanly.

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{error, info, trace, warn};

use crate::client::StreamsClientTrait;
use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::fetch::{fetch_batch, FetchOutcome};
use crate::iterator::{acquire_latest, reacquire};
use crate::locator::{resolve, ShardLocation};
use crate::sink::EventSink;

/// Tails the table's change stream and replays each non-empty batch into
/// the sink, in provider order, one batch at a time.
pub struct StreamRelay<C, S>
where
    C: StreamsClientTrait,
    S: EventSink,
{
    client: C,
    sink: S,
    config: RelayConfig,
}

impl<C, S> StreamRelay<C, S>
where
    C: StreamsClientTrait,
    S: EventSink,
{
    pub fn new(config: RelayConfig, client: C, sink: S) -> Self {
        Self {
            client,
            sink,
            config,
        }
    }

    /// Run until a fatal error or a shutdown signal.
    ///
    /// Shutdown is reported as `Ok(())`; every other exit carries the error
    /// that stopped the loop.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(table = %self.config.table_name, "Starting stream relay");

        match self.poll_loop(&mut shutdown).await {
            Ok(()) => Ok(()),
            Err(RelayError::Shutdown) => {
                info!("Relay shutdown complete");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "Relay terminated");
                Err(err)
            }
        }
    }

    async fn poll_loop(&self, shutdown: &mut watch::Receiver<bool>) -> Result<()> {
        let location = self.await_topology(shutdown).await?;
        info!(
            stream_arn = %location.stream_arn,
            shard_id = %location.shard_id,
            "Resolved stream topology"
        );

        let mut iterator = tokio::select! {
            acquired = acquire_latest(&self.client, &location) => acquired?,
            _ = shutdown.changed() => return Err(RelayError::Shutdown),
        };

        info!(table = %self.config.table_name, "Entering poll loop");

        loop {
            if *shutdown.borrow() {
                return Err(RelayError::Shutdown);
            }

            let outcome = tokio::select! {
                outcome = fetch_batch(&self.client, &iterator, self.config.batch_size) => outcome?,
                _ = shutdown.changed() => return Err(RelayError::Shutdown),
            };

            match outcome {
                FetchOutcome::Batch {
                    records,
                    next_iterator,
                } => {
                    iterator = next_iterator;

                    if records.is_empty() {
                        trace!("No records this cycle");
                    } else {
                        info!(records = records.len(), "Dispatching record batch");
                        tokio::select! {
                            delivered = self.sink.deliver(&records) => delivered?,
                            _ = shutdown.changed() => return Err(RelayError::Shutdown),
                        }
                    }
                }
                FetchOutcome::Expired => {
                    iterator = tokio::select! {
                        acquired = reacquire(&self.client, &location) => acquired?,
                        _ = shutdown.changed() => return Err(RelayError::Shutdown),
                    };
                }
            }

            self.pause(shutdown).await?;
        }
    }

    /// Bootstrap phase: retry topology resolution at the poll interval until
    /// the table has exactly one stream with exactly one shard.
    ///
    /// Provider errors count as "not ready yet" and are retried like
    /// ambiguous topology. A freshly enabled stream can take a while to
    /// appear, and a local endpoint may come up after this process does.
    async fn await_topology(&self, shutdown: &mut watch::Receiver<bool>) -> Result<ShardLocation> {
        loop {
            if *shutdown.borrow() {
                return Err(RelayError::Shutdown);
            }

            let resolved = tokio::select! {
                resolved = resolve(&self.client, &self.config.table_name) => resolved,
                _ = shutdown.changed() => return Err(RelayError::Shutdown),
            };

            match resolved {
                Ok(Some(location)) => return Ok(location),
                Ok(None) => {}
                Err(err) => {
                    warn!(error = %err, "Stream API not ready, will retry");
                }
            }

            self.pause(shutdown).await?;
        }
    }

    async fn pause(&self, shutdown: &mut watch::Receiver<bool>) -> Result<()> {
        tokio::select! {
            _ = sleep(self.config.poll_interval) => Ok(()),
            _ = shutdown.changed() => Err(RelayError::Shutdown),
        }
    }
}
