//! `jobwatch identity`: print the history key a job invocation maps to.

use anyhow::Result;

use crate::models::{describe_params, JobIdentity};

pub fn execute(name: &str, args: &[String]) -> Result<()> {
    let id = JobIdentity::derive(name, args);
    println!("{id}");
    if !args.is_empty() {
        println!("params: {}", describe_params(args));
    }
    Ok(())
}
