//! Run command: one collector and the inbound relay
//!
//! Startup order follows the broker session: connect, subscribe to the input
//! topic, start the relay, then load the dataset and start the replay loop.
//! A fatal collector failure ends the command with an error; a contained
//! failure or a missing dataset leaves the process relaying until shutdown.

use crate::Result;
use crate::app::adapters::publisher::{MqttPublisher, Publisher, StdoutPublisher};
use crate::app::services::collector::Collector;
use crate::app::services::emitter::Emitter;
use crate::app::services::relay::MessageRelay;
use crate::app::services::supervisor::TaskOutcome;
use crate::cli::args::RunArgs;
use crate::cli::commands::shared::setup_logging;
use crate::config::Config;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub async fn run_collector(args: RunArgs, cancellation_token: CancellationToken) -> Result<()> {
    setup_logging(&args.log)?;
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    if args.dry_run {
        return run_dry_run(&config).await;
    }

    let name = config.collector.collector_name.clone();
    info!("{}: connecting to broker {}:{}", name, config.broker.host, config.broker.port);

    let session =
        MqttPublisher::connect(&config.broker, Some(&config.collector.input_topic)).await?;
    let mqtt = Arc::new(session.publisher);
    let publisher: Arc<dyn Publisher> = mqtt.clone();
    let emitter = Emitter::new(publisher, &config.collector.output_topic);

    let relay = tokio::spawn(MessageRelay::new(emitter.clone()).run(session.inbound));

    if let Some(collector) = Collector::prepare(&config.collector).await? {
        let task = collector.spawn(emitter, config.collector.pacing());
        if let TaskOutcome::Disabled { correlation_id } = task.join().await? {
            info!("{}: replay disabled ({}), relay keeps running", name, correlation_id);
        }
    }

    cancellation_token.cancelled().await;
    relay.abort();
    if let Err(e) = mqtt.disconnect().await {
        warn!("{}: error disconnecting from broker: {}", name, e);
    }
    session.event_loop.abort();
    Ok(())
}

/// Defaults, then environment, then command-line flags
fn load_configuration(args: &RunArgs) -> Result<Config> {
    let mut config = Config::from_env(args.collector)?;
    config.collector = args.apply_to(config.collector);
    config.validate()?;
    Ok(config)
}

/// Print a single replay cycle to stdout without connecting
async fn run_dry_run(config: &Config) -> Result<()> {
    info!(
        "DRY RUN: replaying one cycle of {} to stdout",
        config.collector.data_file.display()
    );

    let emitter = Emitter::new(Arc::new(StdoutPublisher), &config.collector.output_topic);
    match Collector::prepare(&config.collector).await? {
        Some(collector) => {
            let published = collector.run_once(&emitter).await?;
            info!("DRY RUN: {} envelopes for {}", published, collector.kind());
        }
        None => info!("DRY RUN: nothing to replay"),
    }
    Ok(())
}
