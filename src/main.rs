//! Binary entrypoint for the stream relay

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_credential_types::Credentials;
use dynamo_stream_relay::{RelayConfig, SamLocalSink, StreamRelay};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,dynamo_stream_relay=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn build_client(config: &RelayConfig) -> aws_sdk_dynamodbstreams::Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.aws_region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let Some(endpoint) = &config.aws_endpoint {
        loader = loader.endpoint_url(endpoint.clone());
        // A local endpoint still expects signed requests; use dummy
        // credentials when no real ones are configured.
        if std::env::var("AWS_ACCESS_KEY_ID").is_err() {
            loader = loader.credentials_provider(SharedCredentialsProvider::new(
                Credentials::new("local", "local", None, None, "dynamo-stream-relay"),
            ));
        }
    }

    let sdk_config = loader.load().await;
    aws_sdk_dynamodbstreams::Client::new(&sdk_config)
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match RelayConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let client = build_client(&config).await;
    let sink = SamLocalSink::new(&config);
    let relay = StreamRelay::new(config, client, sink);

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    if let Err(err) = relay.run(shutdown_rx).await {
        error!(error = %err, "Relay exited with error");
        std::process::exit(1);
    }
}
