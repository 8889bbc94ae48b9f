// tests/common/mod.rs
use std::time::Duration;

use dynamo_stream_relay::test::mocks::{MockEventSink, MockStreamsClient};
use dynamo_stream_relay::test::TestUtils;
use dynamo_stream_relay::RelayConfig;

pub fn create_test_config() -> RelayConfig {
    RelayConfig {
        table_name: "orders".to_string(),
        function_name: "OrdersHandler".to_string(),
        docker_network: "local-dev".to_string(),
        poll_interval: Duration::from_millis(10),
        ..RelayConfig::default()
    }
}

pub struct TestContext {
    pub config: RelayConfig,
    pub client: MockStreamsClient,
    pub sink: MockEventSink,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            config: create_test_config(),
            client: MockStreamsClient::new(),
            sink: MockEventSink::new(),
        }
    }

    /// Queue a single-stream, single-shard topology and an initial iterator.
    pub async fn setup_topology(&self) {
        self.client
            .mock_list_streams(Ok(vec![TestUtils::create_test_stream("stream-arn-1")]))
            .await;
        self.client
            .mock_describe_stream(Ok(vec![TestUtils::create_test_shard("shardId-001")]))
            .await;
        self.client
            .mock_get_iterator(Ok(Some("iterator-1".to_string())))
            .await;
    }
}

/// Poll until the sink saw `expected` deliveries or the timeout elapses.
pub async fn verify_delivery_count(
    sink: &MockEventSink,
    expected: usize,
    timeout: Duration,
) -> anyhow::Result<()> {
    let start = std::time::Instant::now();
    while sink.deliver_count() < expected {
        if start.elapsed() > timeout {
            anyhow::bail!(
                "Timeout waiting for {} deliveries, got {}",
                expected,
                sink.deliver_count()
            );
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    Ok(())
}
