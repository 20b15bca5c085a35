use clap::{Parser, Subcommand};
use std::path::PathBuf;
use log::debug;

/// Installed Plugin Registry Tool
#[derive(Parser, Debug)]
#[command(name = "plugman")]
#[command(about = "A local installed-plugin registry and API compatibility checker for host tools")]
#[command(version)]
pub struct Args {
    /// Registry file path (defaults to ~/.plugman/installed)
    #[arg(long = "registry-file", value_name = "FILE")]
    pub registry_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL")]
    pub log_file_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Registry operations
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install a plugin entry, replacing any entry in the same slot
    Install {
        /// Plugin name (e.g. com.example.plugin)
        name: String,
        /// API version the plugin was built against (e.g. 1.0.0-SNAPSHOT)
        api_version: String,
        /// Installation slot (e.g. main)
        slot: String,
    },
    /// List installed plugin entries
    List {
        /// Output format: text or json
        #[arg(long, value_name = "FORMAT", default_value = "text")]
        format: String,
    },
    /// Check whether an entry is installed
    Has {
        /// Coordinate string name:version:slot
        coordinates: String,
    },
    /// Remove an installed entry (absent entries are ignored)
    Remove {
        /// Coordinate string name:version:slot
        coordinates: String,
    },
    /// Check API compatibility between a host version and an entry
    Check {
        /// Host runtime API version (e.g. 1.0.2.Final)
        host_version: String,
        /// Coordinate string name:version:slot
        coordinates: String,
    },
}

impl Args {
    /// Console log level implied by the verbosity flags
    pub fn console_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Trace
        } else if self.verbose {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Error
        } else {
            log::LevelFilter::Info
        }
    }
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    let args = Args::parse();
    debug!("Parsed CLI arguments: {:?}", args);
    args
}
