//! Command implementations for the vessel collector CLI
//!
//! Each command lives in its own module:
//! - `run`: one collector plus the inbound relay over a broker session
//! - `simulate`: the leaf-device reading generator

pub mod run;
pub mod shared;
pub mod simulate;

use crate::Result;
use crate::cli::args::{Args, Commands};
use tokio_util::sync::CancellationToken;

/// Dispatch to the subcommand handler
///
/// Both commands run until `cancellation_token` fires or a fatal error
/// occurs.
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<()> {
    match args.command {
        Some(Commands::Run(run_args)) => run::run_collector(run_args, cancellation_token).await,
        Some(Commands::Simulate(simulate_args)) => {
            simulate::run_simulate(simulate_args, cancellation_token).await
        }
        None => Err(crate::Error::configuration("No command given")),
    }
}
