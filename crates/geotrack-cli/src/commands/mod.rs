//! Command implementations

mod cluster;
mod config;
mod distance;
mod heatmap;
mod route;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(cli.config.as_deref(), (&cli.overrides).into())?;

    match cli.command {
        Commands::Route(args) => route::execute(args, &config, &output),
        Commands::Distance(args) => distance::execute(args, &output),
        Commands::Cluster(args) => cluster::execute(args, &config, &output),
        Commands::Heatmap(args) => heatmap::execute(args, &output),
        Commands::Config => config::execute(&config, &output),
    }
}
