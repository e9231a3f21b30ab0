use anyhow::Context;
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;
use vessel_collectors::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    if let Err(error) = run_main(args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

fn run_main(args: Args) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

    runtime.block_on(async {
        // Create cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to install CTRL+C signal handler: {}", e);
                std::future::pending::<()>().await;
            }
            cancellation_token.cancel();
        };

        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result.context("Collector stopped")
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Ok(())
            }
        }
    })
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Vessel Collector - instrument export replay over MQTT");
    println!("=====================================================");
    println!();
    println!("Replays a static instrument export as paced JSON telemetry envelopes");
    println!("and relays inbound messages to the output topic.");
    println!();
    println!("USAGE:");
    println!("    vessel-collector <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    run         Run one collector (vessel1, vessel2 or vessel3)");
    println!("    simulate    Simulate a leaf device sending random readings");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Replay the tag-mapped CSV with its mapping file:");
    println!("    vessel-collector run --collector vessel1 --map-file Vessel1TagMapping.csv");
    println!();
    println!("    # Print one cycle of the HTML table dump without connecting:");
    println!("    vessel-collector run --collector vessel3 --dry-run");
    println!();
    println!("    # Send batches of 5 simulated readings:");
    println!("    DEVICE_CONNECTION_STRING=mqtt://localhost:1883 vessel-collector simulate -n 5");
    println!();
    println!("ENVIRONMENT:");
    println!("    BROKER_CONNECTION_STRING   Broker for the run command");
    println!("    VESSEL_DATA_FILE           Dataset path override");
    println!("    RUST_LOG                   Tracing filter, overrides -v/-q");
}
