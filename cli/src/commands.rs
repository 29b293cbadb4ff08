pub mod connect;
pub mod expand;
pub mod validate;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use surveyr_common::config::{Config, DEFAULT_REQUEST_TIMEOUT};

#[derive(Parser)]
#[command(name = "surveyr")]
#[command(version, about = "Validate scan sources and run Satellite connect scans.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Do not print the banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Print less; repeat to print results only
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Print debug output; repeat for trace output
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Timeout for a single HTTP request, in seconds
    #[arg(long, global = true, value_name = "SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub timeout: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse host specifications and list the hosts they denote
    #[command(alias = "e")]
    Expand {
        #[arg(required = true, value_name = "HOST")]
        tokens: Vec<String>,
        /// Hosts to list per specification
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Validate every source of an inventory file
    #[command(alias = "v")]
    Validate { inventory: PathBuf },
    /// Run connect scans against the Satellite sources of an inventory file
    #[command(alias = "c")]
    Connect {
        inventory: PathBuf,
        /// Only scan the named source; may be repeated
        #[arg(long = "source", value_name = "NAME")]
        sources: Vec<String>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl From<&CommandLine> for Config {
    fn from(cmd: &CommandLine) -> Self {
        Self {
            no_banner: cmd.no_banner,
            quiet: cmd.quiet,
            verbosity: cmd.verbose,
            request_timeout: Duration::from_secs(cmd.timeout.max(1)),
            ..Config::default()
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
