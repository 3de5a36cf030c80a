use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jobwatch")]
#[command(about = "Run jobs under supervision and report their status to a log store", long_about = None)]
#[command(version)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config.toml (defaults to $JOBWATCH_CONFIG or the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a command as a monitored job
    ///
    /// The command's arguments form the job identity, so repeated runs with
    /// the same arguments share one history.
    Run {
        /// Job name (defaults to the program's file name)
        #[arg(short, long)]
        name: Option<String>,

        /// Run without contacting the log store
        #[arg(long)]
        no_monitor: bool,

        /// Seconds to wait for completion before each heartbeat
        #[arg(long, value_name = "SECS")]
        heartbeat: Option<f64>,

        /// Minimum seconds between RUNNING updates
        #[arg(long, value_name = "SECS")]
        ping_delay: Option<f64>,

        /// Program to run
        program: String,

        /// Arguments passed to the program
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Show the stored status history of a job
    History {
        /// Job name
        name: String,

        /// Show only the newest N runs
        #[arg(short, long)]
        limit: Option<usize>,

        /// Job arguments, as passed to `run`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print the identity a job invocation is recorded under
    Identity {
        /// Job name
        name: String,

        /// Job arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}
