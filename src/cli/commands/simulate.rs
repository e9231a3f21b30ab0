//! Simulate command: the leaf-device reading generator

use crate::app::adapters::publisher::{MqttPublisher, Publisher, StdoutPublisher};
use crate::app::services::simulator::LeafSimulator;
use crate::cli::args::SimulateArgs;
use crate::cli::commands::shared::setup_logging;
use crate::config::{BrokerConfig, SimulatorConfig};
use crate::constants::env_vars;
use crate::{Error, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub async fn run_simulate(args: SimulateArgs, cancellation_token: CancellationToken) -> Result<()> {
    setup_logging(&args.log)?;

    let config = args.apply_to(SimulatorConfig::default().apply_env(|key| std::env::var(key).ok()));
    debug!("Simulator configuration: {:?}", config);

    let publisher: Arc<dyn Publisher> = if args.dry_run {
        Arc::new(StdoutPublisher)
    } else {
        let connection_string = std::env::var(env_vars::DEVICE_CONNECTION_STRING).map_err(|_| {
            Error::configuration(format!(
                "{} must be set to reach the broker",
                env_vars::DEVICE_CONNECTION_STRING
            ))
        })?;
        info!("Leaf Device: Creating device client from connection string");
        let broker = BrokerConfig::from_connection_string(&connection_string)?;
        Arc::new(MqttPublisher::connect(&broker, None).await?.publisher)
    };

    tokio::select! {
        result = LeafSimulator::new(config).run(publisher) => result,
        _ = cancellation_token.cancelled() => {
            info!("Leaf Device: Exiting!");
            Ok(())
        }
    }
}
