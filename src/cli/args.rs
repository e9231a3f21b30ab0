//! Command-line argument definitions for the vessel collectors
//!
//! Every flag overrides the matching environment variable, which in turn
//! overrides the built-in default of the chosen collector.

use crate::app::models::CollectorKind;
use crate::config::{CollectorConfig, SimulatorConfig};
use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the vessel collectors
#[derive(Debug, Clone, Parser)]
#[command(
    name = "vessel-collector",
    version,
    about = "Replay vessel instrument exports as paced MQTT telemetry",
    long_about = "Reads a static instrument export (tag-mapped CSV, sectioned instrument CSV \
                  or an HTML table dump) once at startup and replays it forever as normalized \
                  JSON telemetry envelopes on an MQTT topic. Messages arriving on the input \
                  topic are relayed unchanged to the output topic."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run one collector against its dataset
    Run(RunArgs),
    /// Simulate a leaf device sending random readings
    Simulate(SimulateArgs),
}

/// Logging flags shared by every subcommand
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct LogArgs {
    /// Increase logging verbosity
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl LogArgs {
    /// Log level for the crate's tracing filter
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Arguments for the run command
#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Which collector to run
    #[arg(short = 'c', long = "collector", value_enum, env = "VESSEL_COLLECTOR")]
    pub collector: CollectorKind,

    /// Dataset file read once at startup
    #[arg(short = 'd', long = "data-file", value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Tag mapping file (vessel1 only)
    #[arg(short = 'm', long = "map-file", value_name = "PATH")]
    pub map_file: Option<PathBuf>,

    /// Device identifier stamped on markup records (vessel3 only)
    #[arg(long = "device-id", value_name = "ID")]
    pub device_id: Option<String>,

    /// Seconds between replay cycles
    #[arg(long = "pacing-secs", value_name = "SECS")]
    pub pacing_secs: Option<u64>,

    /// Output topic for envelopes and relayed messages
    #[arg(long = "output-topic", value_name = "TOPIC")]
    pub output_topic: Option<String>,

    /// Print one cycle of envelopes to stdout instead of connecting
    #[arg(long = "dry-run", help = "Print one replay cycle to stdout and exit")]
    pub dry_run: bool,

    #[command(flatten)]
    pub log: LogArgs,
}

impl RunArgs {
    /// Apply the command-line overrides on top of `config`
    pub fn apply_to(&self, mut config: CollectorConfig) -> CollectorConfig {
        if let Some(path) = &self.data_file {
            config = config.with_data_file(path);
        }
        if let Some(path) = &self.map_file {
            config = config.with_map_file(path);
        }
        if let Some(device_id) = &self.device_id {
            config = config.with_device_id(device_id);
        }
        if let Some(secs) = self.pacing_secs {
            config = config.with_pacing_secs(secs);
        }
        if let Some(topic) = &self.output_topic {
            config = config.with_output_topic(topic);
        }
        config
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<()> {
        if self.map_file.is_some() && self.collector != CollectorKind::Vessel1 {
            return Err(Error::configuration(format!(
                "--map-file only applies to the vessel1 collector, not {}",
                self.collector
            )));
        }
        if self.device_id.is_some() && self.collector != CollectorKind::Vessel3 {
            return Err(Error::configuration(format!(
                "--device-id only applies to the vessel3 collector, not {}",
                self.collector
            )));
        }
        if self.pacing_secs == Some(0) {
            return Err(Error::configuration("--pacing-secs must be at least 1"));
        }
        Ok(())
    }
}

/// Arguments for the simulate command
#[derive(Debug, Clone, Parser)]
pub struct SimulateArgs {
    /// Messages per batch
    #[arg(short = 'n', long = "message-count", value_name = "COUNT")]
    pub message_count: Option<usize>,

    /// Topic the simulated readings are published on
    #[arg(long = "topic", value_name = "TOPIC")]
    pub topic: Option<String>,

    /// Print readings to stdout instead of connecting
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    #[command(flatten)]
    pub log: LogArgs,
}

impl SimulateArgs {
    pub fn apply_to(&self, mut config: SimulatorConfig) -> SimulatorConfig {
        if let Some(count) = self.message_count {
            config = config.with_message_count(count);
        }
        if let Some(topic) = &self.topic {
            config.topic = topic.clone();
        }
        config
    }
}
