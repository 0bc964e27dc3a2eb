//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// tof-sim - synthetic time-of-flight camera and range characterization
#[derive(Parser, Debug)]
#[command(
    name = "tof-sim",
    author,
    version,
    about = "Time-of-flight camera simulator",
    long_about = "Synthesizes four-phase raw ToF packets of a sphere in front of a flat \n\
                  background, demodulates them into distance and amplitude maps, and \n\
                  characterizes range bias and precision under a quadratic noise model."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TOF_SIM_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "TOF_SIM_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one raw packet and demodulate it
    Generate(GenerateArgs),

    /// Demodulate a raw packet dumped by `generate --output`
    Demodulate(DemodulateArgs),

    /// Generate and demodulate at the configured frame rate
    Stream(StreamArgs),

    /// Characterize range bias and precision over a distance sweep
    Characterize(CharacterizeArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

/// Arguments for the `generate` command
#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to configuration file (TOML or JSON); defaults apply when absent
    #[arg(short, long, env = "TOF_SIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override sensor width
    #[arg(long, env = "TOF_SIM_WIDTH")]
    pub width: Option<u32>,

    /// Override sensor height
    #[arg(long, env = "TOF_SIM_HEIGHT")]
    pub height: Option<u32>,

    /// Frame counter written into the packet header
    #[arg(long, default_value = "0")]
    pub frame_counter: u32,

    /// Override the random seed
    #[arg(long, env = "TOF_SIM_SEED")]
    pub seed: Option<u64>,

    /// Write the raw packet in wire form to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the frame summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `demodulate` command
#[derive(Parser, Debug, Clone)]
pub struct DemodulateArgs {
    /// Raw packet file in wire form
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "TOF_SIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the amplitude validity threshold
    #[arg(long, env = "TOF_SIM_THRESHOLD")]
    pub threshold: Option<f32>,

    /// Override the unambiguous range (m)
    #[arg(long, env = "TOF_SIM_RANGE")]
    pub range: Option<f32>,

    /// Print the frame summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `stream` command
#[derive(Parser, Debug, Clone)]
pub struct StreamArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "TOF_SIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum number of frames to produce (0 = unlimited)
    #[arg(long, default_value = "0", env = "TOF_SIM_MAX_FRAMES")]
    pub max_frames: u64,

    /// Run timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "TOF_SIM_TIMEOUT")]
    pub timeout: u64,

    /// Override the frame rate (Hz)
    #[arg(long, env = "TOF_SIM_FRAME_RATE")]
    pub frame_rate: Option<f64>,

    /// Override the random seed
    #[arg(long, env = "TOF_SIM_SEED")]
    pub seed: Option<u64>,

    /// Packets buffered between generator and demodulator
    #[arg(long, default_value = "16", env = "TOF_SIM_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "TOF_SIM_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `characterize` command
#[derive(Parser, Debug, Clone)]
pub struct CharacterizeArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "TOF_SIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "table")]
    pub format: ReportFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run distances on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Override the random seed
    #[arg(long, env = "TOF_SIM_SEED")]
    pub seed: Option<u64>,

    /// Override samples per distance
    #[arg(long)]
    pub samples: Option<usize>,

    /// Override pixels averaged per sample
    #[arg(long)]
    pub pixels: Option<usize>,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "tof.toml", env = "TOF_SIM_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

/// Characterization report format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Aligned text table
    #[default]
    Table,
    Csv,
    Json,
}
