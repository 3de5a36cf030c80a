use anyhow::Result;
use jobwatch::commands::run::RunOptions;
use jobwatch::commands::{history, identity, run};
use std::path::PathBuf;

use super::types::Commands;

pub fn dispatch(command: Commands, config: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Run {
            name,
            no_monitor,
            heartbeat,
            ping_delay,
            program,
            args,
        } => run::execute(RunOptions {
            name,
            program,
            args,
            config_path: config,
            no_monitor,
            heartbeat_secs: heartbeat,
            ping_delay_secs: ping_delay,
        }),
        Commands::History { name, limit, args } => {
            history::execute(config.as_deref(), &name, &args, limit)
        }
        Commands::Identity { name, args } => identity::execute(&name, &args),
    }
}
