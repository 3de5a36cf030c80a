mod cli;

use clap::Parser;
use jobwatch::commands::run::CommandFailed;
use std::process::ExitCode;

use cli::{dispatch, init_tracing, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli.command, cli.config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(failed) = e.downcast_ref::<CommandFailed>() {
                eprintln!("Error: {failed}");
                return ExitCode::from(u8::try_from(failed.code).unwrap_or(1));
            }
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
